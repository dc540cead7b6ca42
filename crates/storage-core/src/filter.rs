//! # List Filters
//!
//! Search-box filters for the product, supplier and document lists, plus
//! the newest-first orderings used by the history views.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::stock::StockFilter;
use crate::types::{ActivityLogEntry, Document, DocumentType, Product, Sale, Supplier, SupplierType};

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn blank(s: &Option<String>) -> bool {
    s.as_deref().map_or(true, |s| s.trim().is_empty())
}

// =============================================================================
// Products
// =============================================================================

/// Product list filter. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductFilter {
    /// Case-insensitive name substring.
    pub query: Option<String>,
    /// Exact supplier display name.
    pub supplier: Option<String>,
    pub stock: StockFilter,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        let by_name = blank(&self.query)
            || contains_ci(&product.name, self.query.as_deref().unwrap_or_default().trim());
        let by_supplier = blank(&self.supplier)
            || product.supplier.as_deref() == self.supplier.as_deref();
        by_name && by_supplier && self.stock.matches(product.quantity)
    }

    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        products.into_iter().filter(|p| self.matches(p)).collect()
    }
}

// =============================================================================
// Suppliers
// =============================================================================

/// Supplier list filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct SupplierFilter {
    /// Case-insensitive display-name substring.
    pub query: Option<String>,
    pub supplier_type: Option<SupplierType>,
}

impl SupplierFilter {
    pub fn matches(&self, supplier: &Supplier) -> bool {
        let by_name = blank(&self.query)
            || contains_ci(
                &supplier.display_name(),
                self.query.as_deref().unwrap_or_default().trim(),
            );
        let by_type = self.supplier_type.map_or(true, |t| t == supplier.supplier_type);
        by_name && by_type
    }

    pub fn apply(&self, suppliers: Vec<Supplier>) -> Vec<Supplier> {
        suppliers.into_iter().filter(|s| self.matches(s)).collect()
    }
}

// =============================================================================
// Documents
// =============================================================================

/// Document list filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentFilter {
    /// Case-insensitive title substring.
    pub query: Option<String>,
    pub document_type: Option<DocumentType>,
}

impl DocumentFilter {
    pub fn matches(&self, document: &Document) -> bool {
        let by_title = blank(&self.query)
            || contains_ci(&document.title, self.query.as_deref().unwrap_or_default().trim());
        let by_type = self.document_type.map_or(true, |t| t == document.document_type);
        by_title && by_type
    }

    /// Filters, then orders newest first.
    pub fn apply(&self, documents: Vec<Document>) -> Vec<Document> {
        let mut docs: Vec<Document> = documents.into_iter().filter(|d| self.matches(d)).collect();
        newest_documents_first(&mut docs);
        docs
    }
}

// =============================================================================
// Orderings
// =============================================================================

/// Documents by creation time, newest first; undated ones last, by id.
pub fn newest_documents_first(docs: &mut [Document]) {
    docs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

/// Sales by date, newest first.
pub fn newest_sales_first(sales: &mut [Sale]) {
    sales.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
}

/// Activity by timestamp, newest first.
pub fn newest_activity_first(entries: &mut [ActivityLogEntry]) {
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use chrono::{TimeZone, Utc};

    fn product(name: &str, qty: i64, supplier: Option<&str>) -> Product {
        let p = Product::new(name, Money::from_cents(100), Money::from_cents(200), qty);
        match supplier {
            Some(s) => p.with_supplier(s),
            None => p,
        }
    }

    #[test]
    fn test_product_filter() {
        let products = vec![
            product("Blue Pen", 10, Some("Acme")),
            product("Red pen", 3, Some("Globex")),
            product("Notebook", 0, Some("Acme")),
        ];

        let f = ProductFilter {
            query: Some("PEN".into()),
            ..Default::default()
        };
        assert_eq!(f.apply(products.clone()).len(), 2);

        let f = ProductFilter {
            supplier: Some("Acme".into()),
            stock: StockFilter::OutOfStock,
            ..Default::default()
        };
        let found = f.apply(products.clone());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Notebook");

        assert_eq!(ProductFilter::default().apply(products).len(), 3);
    }

    #[test]
    fn test_supplier_filter() {
        let suppliers = vec![
            Supplier::named(SupplierType::Company, "Acme LLC"),
            Supplier::self_employed("Petrov", "Petr", None),
        ];
        let f = SupplierFilter {
            query: Some("petr".into()),
            supplier_type: None,
        };
        assert_eq!(f.apply(suppliers.clone()).len(), 1);

        let f = SupplierFilter {
            query: None,
            supplier_type: Some(SupplierType::Company),
        };
        assert_eq!(f.apply(suppliers)[0].display_name(), "Acme LLC");
    }

    #[test]
    fn test_documents_newest_first() {
        let mut old = Document::new("Old contract", DocumentType::Contract, "");
        old.created_at = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let mut new = Document::new("New invoice", DocumentType::Invoice, "");
        new.created_at = Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());

        let docs = DocumentFilter::default().apply(vec![old, new]);
        assert_eq!(docs[0].title, "New invoice");

        let f = DocumentFilter {
            query: None,
            document_type: Some(DocumentType::Contract),
        };
        assert_eq!(f.apply(docs).len(), 1);
    }
}
