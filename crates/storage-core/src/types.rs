//! # Domain Types
//!
//! Records stored in the collections, plus the notification and settings
//! types shared by the alert engine and the app.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Collection records (implement `Record`)                                │
//! │  ┌────────────┐ ┌────────────┐ ┌────────────┐ ┌────────────┐           │
//! │  │  Product   │ │  Supplier  │ │    Sale    │ │  Document  │           │
//! │  │ warehouse  │ │ suppliers  │ │   sales    │ │ documents  │           │
//! │  └────────────┘ └────────────┘ └─────┬──────┘ └────────────┘           │
//! │  ┌────────────┐ ┌──────────────────┐ │ items                           │
//! │  │    User    │ │ ActivityLogEntry │ ▼                                  │
//! │  │   users    │ │     activity     │ SaleItem (frozen snapshot)         │
//! │  └────────────┘ └──────────────────┘                                    │
//! │                                                                         │
//! │  Settings blobs                                                         │
//! │  AlertSettings · Theme · Notification log                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every record is keyed by an auto-assigned integer `id`. A record that has
//! not been stored yet carries `id: None`; the store fills it in on read.
//! Field names on the wire are camelCase.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Collections
// =============================================================================

/// The fixed set of named collections.
///
/// `Products` persists under the legacy key `warehouse`, which is also the
/// key used in export files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Products,
    Suppliers,
    Sales,
    Documents,
    Users,
    Activity,
}

impl Collection {
    /// Every collection, in export order.
    pub const ALL: [Collection; 6] = [
        Collection::Products,
        Collection::Suppliers,
        Collection::Sales,
        Collection::Documents,
        Collection::Users,
        Collection::Activity,
    ];

    /// Table name and snapshot key.
    pub const fn key(&self) -> &'static str {
        match self {
            Collection::Products => "warehouse",
            Collection::Suppliers => "suppliers",
            Collection::Sales => "sales",
            Collection::Documents => "documents",
            Collection::Users => "users",
            Collection::Activity => "activity",
        }
    }

    /// Resolves a snapshot key or a collection name.
    ///
    /// ```rust
    /// use storage_core::Collection;
    ///
    /// assert_eq!(Collection::from_key("warehouse"), Some(Collection::Products));
    /// assert_eq!(Collection::from_key("products"), Some(Collection::Products));
    /// assert_eq!(Collection::from_key("orders"), None);
    /// ```
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "warehouse" | "products" => Some(Collection::Products),
            "suppliers" => Some(Collection::Suppliers),
            "sales" => Some(Collection::Sales),
            "documents" => Some(Collection::Documents),
            "users" => Some(Collection::Users),
            "activity" => Some(Collection::Activity),
            _ => None,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A serde type stored in one collection.
///
/// The store strips `id` before writing the body and injects it back on read,
/// so implementors only need to expose the field.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection the record lives in.
    const COLLECTION: Collection;

    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: i64);
}

macro_rules! impl_record {
    ($ty:ty, $collection:expr) => {
        impl Record for $ty {
            const COLLECTION: Collection = $collection;

            fn id(&self) -> Option<i64> {
                self.id
            }

            fn set_id(&mut self, id: i64) {
                self.id = Some(id);
            }
        }
    };
}

// =============================================================================
// Product
// =============================================================================

/// A product in the warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub id: Option<i64>,

    pub name: String,

    /// Purchase price per unit.
    #[ts(type = "number")]
    pub purchase_price: Money,

    /// Sale price per unit.
    #[ts(type = "number")]
    pub sale_price: Money,

    /// Units on hand. Never negative after a settlement.
    pub quantity: i64,

    /// Display name of the supplier, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub supplier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl_record!(Product, Collection::Products);

impl Product {
    /// Creates an unsaved product.
    pub fn new(name: impl Into<String>, purchase_price: Money, sale_price: Money, quantity: i64) -> Self {
        Product {
            id: None,
            name: name.into(),
            purchase_price,
            sale_price,
            quantity,
            supplier: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Sets the supplier display name.
    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }
}

// =============================================================================
// Supplier
// =============================================================================

/// Legal form of a supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SupplierType {
    /// Self-employed person, identified by full name.
    SelfEmployed,
    /// Individual entrepreneur, identified by trade name.
    Individual,
    Company,
}

/// A supplier in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub id: Option<i64>,

    #[serde(rename = "type")]
    pub supplier_type: SupplierType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub last_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub middle_name: Option<String>,

    /// Trade name for individual and company suppliers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub name: Option<String>,

    /// Taxpayer identification number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub inn: Option<String>,

    /// State registration number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub ogrn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl_record!(Supplier, Collection::Suppliers);

impl Supplier {
    /// Creates an unsaved company or individual supplier.
    pub fn named(supplier_type: SupplierType, name: impl Into<String>) -> Self {
        Supplier {
            name: Some(name.into()),
            ..Supplier::empty(supplier_type)
        }
    }

    /// Creates an unsaved self-employed supplier.
    pub fn self_employed(
        last_name: impl Into<String>,
        first_name: impl Into<String>,
        middle_name: Option<String>,
    ) -> Self {
        Supplier {
            last_name: Some(last_name.into()),
            first_name: Some(first_name.into()),
            middle_name,
            ..Supplier::empty(SupplierType::SelfEmployed)
        }
    }

    fn empty(supplier_type: SupplierType) -> Self {
        Supplier {
            id: None,
            supplier_type,
            first_name: None,
            last_name: None,
            middle_name: None,
            name: None,
            inn: None,
            ogrn: None,
            phone: None,
            email: None,
            address: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Name shown in lists and stored on products.
    ///
    /// Self-employed: `"{last} {first} {middle}"` trimmed. Others: `name`,
    /// empty if absent.
    ///
    /// ```rust
    /// use storage_core::Supplier;
    ///
    /// let s = Supplier::self_employed("Ivanov", "Ivan", None);
    /// assert_eq!(s.display_name(), "Ivanov Ivan");
    /// ```
    pub fn display_name(&self) -> String {
        match self.supplier_type {
            SupplierType::SelfEmployed => {
                let part = |p: &Option<String>| p.as_deref().unwrap_or("").to_string();
                format!(
                    "{} {} {}",
                    part(&self.last_name),
                    part(&self.first_name),
                    part(&self.middle_name)
                )
                .trim()
                .to_string()
            }
            SupplierType::Individual | SupplierType::Company => {
                self.name.clone().unwrap_or_default()
            }
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// How the customer paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    /// Bank transfer.
    Transfer,
}

impl PaymentMethod {
    /// Label printed on receipts.
    pub const fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::Transfer => "Bank transfer",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "transfer" => Ok(PaymentMethod::Transfer),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

/// A line of a completed sale, frozen at checkout.
///
/// Older records used `id` and `price`; both are accepted on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    #[serde(alias = "id")]
    pub product_id: i64,

    pub name: String,

    #[serde(alias = "price")]
    #[ts(type = "number")]
    pub unit_price: Money,

    pub quantity: i64,
}

impl SaleItem {
    /// unit_price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// A completed sale. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub id: Option<i64>,

    pub customer_name: String,

    pub payment_method: PaymentMethod,

    pub items: Vec<SaleItem>,

    /// Σ unitPrice × quantity over `items`.
    #[ts(type = "number")]
    pub total_amount: Money,

    #[ts(as = "String")]
    pub date: DateTime<Utc>,
}

impl_record!(Sale, Collection::Sales);

impl Sale {
    /// Recomputes the total from the line snapshots.
    pub fn items_total(&self) -> Money {
        self.items.iter().map(SaleItem::line_total).sum()
    }
}

// =============================================================================
// Document
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Invoice,
    /// Certificate of completed work.
    Act,
    Contract,
    Report,
}

impl DocumentType {
    pub const fn label(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "Invoice",
            DocumentType::Act => "Certificate of completion",
            DocumentType::Contract => "Contract",
            DocumentType::Report => "Report",
        }
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "invoice" => Ok(DocumentType::Invoice),
            "act" => Ok(DocumentType::Act),
            "contract" => Ok(DocumentType::Contract),
            "report" => Ok(DocumentType::Report),
            other => Err(format!("unknown document type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Draft,
    Sent,
    Signed,
    Archived,
}

impl DocumentStatus {
    pub const fn label(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "Draft",
            DocumentStatus::Sent => "Sent",
            DocumentStatus::Signed => "Signed",
            DocumentStatus::Archived => "Archived",
        }
    }
}

/// A business document (invoice, contract, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub id: Option<i64>,

    pub title: String,

    #[serde(rename = "type")]
    pub document_type: DocumentType,

    #[serde(default)]
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub recipient: Option<String>,

    #[serde(default)]
    pub status: DocumentStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl_record!(Document, Collection::Documents);

impl Document {
    /// Creates an unsaved draft.
    pub fn new(title: impl Into<String>, document_type: DocumentType, content: impl Into<String>) -> Self {
        Document {
            id: None,
            title: title.into(),
            document_type,
            content: content.into(),
            recipient: None,
            status: DocumentStatus::Draft,
            created_at: None,
            updated_at: None,
        }
    }
}

// =============================================================================
// Users & Activity
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Manager,
    #[default]
    Employee,
    Viewer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

/// A user account. A record only; nothing here enforces access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub id: Option<i64>,

    pub username: String,

    pub full_name: String,

    pub email: String,

    /// Password hash (PHC string).
    pub password: String,

    #[serde(default)]
    pub role: UserRole,

    #[serde(default)]
    pub status: UserStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub department: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub last_login: Option<DateTime<Utc>>,
}

impl_record!(User, Collection::Users);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Login,
    Create,
    Update,
    Delete,
}

/// One line of the user activity log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub id: Option<i64>,

    #[serde(rename = "type")]
    pub kind: ActivityKind,

    pub description: String,

    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,

    /// Id of the user the entry is about, if any.
    #[serde(default)]
    pub actor: Option<i64>,
}

impl_record!(ActivityLogEntry, Collection::Activity);

impl ActivityLogEntry {
    pub fn new(kind: ActivityKind, description: impl Into<String>, actor: Option<i64>, timestamp: DateTime<Utc>) -> Self {
        ActivityLogEntry {
            id: None,
            kind,
            description: description.into(),
            timestamp,
            actor,
        }
    }
}

// =============================================================================
// Notifications
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    Info,
    Success,
    Warning,
    Error,
}

impl FromStr for NotificationCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(NotificationCategory::Info),
            "success" => Ok(NotificationCategory::Success),
            "warning" => Ok(NotificationCategory::Warning),
            "error" => Ok(NotificationCategory::Error),
            other => Err(format!("unknown notification category: {other}")),
        }
    }
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NotificationCategory::Info => "info",
            NotificationCategory::Success => "success",
            NotificationCategory::Warning => "warning",
            NotificationCategory::Error => "error",
        })
    }
}

/// Stock alert classification, used for deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum AlertKind {
    LowStock,
    OutOfStock,
}

/// Identifies which product condition a notification was raised for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AlertPayload {
    pub kind: AlertKind,
    pub product_id: i64,
}

/// An entry of the notification log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Millisecond timestamp, strictly increasing within a process.
    pub id: i64,

    pub title: String,

    pub message: String,

    pub category: NotificationCategory,

    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub payload: Option<AlertPayload>,
}

// =============================================================================
// Settings
// =============================================================================

/// Alert category toggles. Missing fields default to enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertSettings {
    pub low_stock: bool,
    pub out_of_stock: bool,
    /// Notify after every completed sale.
    pub new_sale: bool,
    /// Notify when a document is created.
    pub document: bool,
}

impl Default for AlertSettings {
    fn default() -> Self {
        AlertSettings {
            low_stock: true,
            out_of_stock: true,
            new_sale: true,
            document: true,
        }
    }
}

impl AlertSettings {
    /// Whether the scan step for `kind` runs.
    pub const fn is_enabled(&self, kind: AlertKind) -> bool {
        match kind {
            AlertKind::LowStock => self.low_stock,
            AlertKind::OutOfStock => self.out_of_stock,
        }
    }
}

/// Aggregate counters recomputed after every alert check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AlertStatus {
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
    pub notification_count: usize,
    #[ts(as = "Option<String>")]
    pub last_check: Option<DateTime<Utc>>,
}

/// UI theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Windows95,
    Modern,
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "windows95" => Ok(Theme::Windows95),
            "modern" => Ok(Theme::Modern),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_keys() {
        for c in Collection::ALL {
            assert_eq!(Collection::from_key(c.key()), Some(c));
        }
        assert_eq!(Collection::Products.key(), "warehouse");
    }

    #[test]
    fn test_product_wire_format() {
        let product = Product::new("Pen", Money::from_cents(50), Money::from_cents(1250), 3);
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(
            value,
            json!({"name": "Pen", "purchasePrice": 0.5, "salePrice": 12.5, "quantity": 3})
        );
    }

    #[test]
    fn test_sale_item_accepts_legacy_keys() {
        let item: SaleItem =
            serde_json::from_value(json!({"id": 4, "name": "Pen", "price": 12.5, "quantity": 2}))
                .unwrap();
        assert_eq!(item.product_id, 4);
        assert_eq!(item.line_total().cents(), 2500);
    }

    #[test]
    fn test_supplier_display_name() {
        let s = Supplier::self_employed("Ivanov", "Ivan", Some("Ivanovich".into()));
        assert_eq!(s.display_name(), "Ivanov Ivan Ivanovich");

        let s = Supplier::self_employed("", "Ivan", None);
        assert_eq!(s.display_name(), "Ivan");

        let s = Supplier::named(SupplierType::Company, "Acme LLC");
        assert_eq!(s.display_name(), "Acme LLC");

        let mut s = Supplier::named(SupplierType::Individual, "x");
        s.name = None;
        assert_eq!(s.display_name(), "");
    }

    #[test]
    fn test_supplier_type_field_is_renamed() {
        let value = serde_json::to_value(Supplier::named(SupplierType::SelfEmployed, "x")).unwrap();
        assert_eq!(value["type"], "self_employed");
    }

    #[test]
    fn test_alert_settings_default_missing_fields() {
        let settings: AlertSettings = serde_json::from_value(json!({"lowStock": false})).unwrap();
        assert!(!settings.low_stock);
        assert!(settings.out_of_stock);
        assert!(settings.new_sale);
        assert!(settings.document);
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!("modern".parse::<Theme>(), Ok(Theme::Modern));
        assert_eq!(Theme::default(), Theme::Windows95);
        assert!("dark".parse::<Theme>().is_err());
        assert_eq!(serde_json::to_value(Theme::Windows95).unwrap(), "windows95");
    }
}
