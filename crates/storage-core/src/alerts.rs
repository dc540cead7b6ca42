//! # Alert Rules
//!
//! The pure half of the alert engine: which products deserve a new alert,
//! what it says, and the counters shown on the status bar.
//!
//! ## Per-product State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  For each (kind, productId):                                           │
//! │                                                                         │
//! │   quiet ── product enters band, toggle on ──► raised (logged once)      │
//! │     ▲                                            │                      │
//! │     │                                            │ later scans: no-op   │
//! │     └──────────── log cleared ◄──────────────────┘                      │
//! │                                                                         │
//! │  Leaving the band does NOT retract the alert.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! "Raised" is tracked in [`RaisedAlerts`], not by looking through the log:
//! the log evicts old entries, and an evicted alert must stay raised.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::notification::NotificationLog;
use crate::stock::{classify, StockLevel};
use crate::types::{AlertKind, AlertPayload, AlertSettings, Document, NotificationCategory, Product, Sale};

/// The (kind, productId) pairs alerted since the log was last cleared.
///
/// Persisted next to the notification log and emptied together with it.
/// Eviction from the log does not remove anything here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RaisedAlerts(BTreeSet<AlertPayload>);

impl RaisedAlerts {
    /// Rebuilds the set from the alerts still in `log`.
    ///
    /// For stores written before the set was persisted on its own.
    pub fn from_log(log: &NotificationLog) -> Self {
        RaisedAlerts(log.entries().iter().filter_map(|n| n.payload).collect())
    }

    pub fn contains(&self, payload: &AlertPayload) -> bool {
        self.0.contains(payload)
    }

    /// Marks `payload` raised. Returns false if it already was.
    pub fn insert(&mut self, payload: AlertPayload) -> bool {
        self.0.insert(payload)
    }

    /// Drops entries for products that no longer exist, so a product
    /// created later under a reused id starts quiet. Returns true if
    /// anything was dropped.
    pub fn retain_products(&mut self, products: &[Product]) -> bool {
        let ids: BTreeSet<i64> = products.iter().filter_map(|p| p.id).collect();
        let before = self.0.len();
        self.0.retain(|payload| ids.contains(&payload.product_id));
        self.0.len() != before
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A notification the scan wants added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertCandidate {
    pub title: String,
    pub message: String,
    pub category: NotificationCategory,
    pub payload: AlertPayload,
}

/// Finds products that need an alert not yet in `raised`.
///
/// Products without an id are skipped. Disabled kinds produce nothing.
/// Running this twice against an unchanged set and product list returns the
/// same candidates, so the engine must insert them into `raised` before the
/// next scan.
pub fn scan(products: &[Product], settings: &AlertSettings, raised: &RaisedAlerts) -> Vec<AlertCandidate> {
    products
        .iter()
        .filter_map(|product| {
            let product_id = product.id?;
            let kind = classify(product.quantity).alert_kind()?;
            if !settings.is_enabled(kind) {
                return None;
            }
            let payload = AlertPayload { kind, product_id };
            if raised.contains(&payload) {
                return None;
            }
            Some(stock_alert(product, payload))
        })
        .collect()
}

fn stock_alert(product: &Product, payload: AlertPayload) -> AlertCandidate {
    match payload.kind {
        AlertKind::LowStock => AlertCandidate {
            title: "Low stock".to_string(),
            message: format!("{}: only {} left in stock", product.name, product.quantity),
            category: NotificationCategory::Warning,
            payload,
        },
        AlertKind::OutOfStock => AlertCandidate {
            title: "Out of stock".to_string(),
            message: format!("{} is out of stock", product.name),
            category: NotificationCategory::Error,
            payload,
        },
    }
}

/// Number of products currently (low, out of) stock.
pub fn stock_counts(products: &[Product]) -> (usize, usize) {
    products.iter().fold((0, 0), |(low, out), p| match classify(p.quantity) {
        StockLevel::Low => (low + 1, out),
        StockLevel::OutOfStock => (low, out + 1),
        StockLevel::InStock => (low, out),
    })
}

/// Title and message of the notification raised after a sale.
pub fn sale_message(sale: &Sale, currency_symbol: &str) -> (String, String) {
    (
        "Sale completed".to_string(),
        format!(
            "{}: {} item(s), total {}",
            sale.customer_name,
            sale.items.iter().map(|i| i.quantity).sum::<i64>(),
            sale.total_amount.format_with(currency_symbol)
        ),
    )
}

/// Title and message of the notification raised when a document is created.
pub fn document_message(document: &Document) -> (String, String) {
    (
        "Document created".to_string(),
        format!("{} \"{}\"", document.document_type.label(), document.title),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use chrono::Utc;

    fn product(id: i64, qty: i64) -> Product {
        let mut p = Product::new(format!("P{id}"), Money::zero(), Money::from_cents(100), qty);
        p.id = Some(id);
        p
    }

    /// Adds candidates the way the engine does: log entry plus raised mark.
    fn add_all(log: &mut NotificationLog, raised: &mut RaisedAlerts, candidates: Vec<AlertCandidate>) {
        for c in candidates {
            raised.insert(c.payload);
            let n = log.compose(c.title, c.message, c.category, Some(c.payload), Utc::now());
            log.push(n);
        }
    }

    #[test]
    fn test_scan_classifies() {
        let found = scan(
            &[product(1, 0), product(2, 5), product(3, 6)],
            &AlertSettings::default(),
            &RaisedAlerts::default(),
        );
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].payload.kind, AlertKind::OutOfStock);
        assert_eq!(found[0].category, NotificationCategory::Error);
        assert_eq!(found[1].payload.kind, AlertKind::LowStock);
        assert_eq!(found[1].category, NotificationCategory::Warning);
    }

    #[test]
    fn test_scan_is_idempotent_once_raised() {
        let mut log = NotificationLog::default();
        let mut raised = RaisedAlerts::default();
        let products = [product(1, 0), product(2, 2)];
        let first = scan(&products, &AlertSettings::default(), &raised);
        add_all(&mut log, &mut raised, first);

        assert!(scan(&products, &AlertSettings::default(), &raised).is_empty());
    }

    #[test]
    fn test_evicted_alert_stays_raised() {
        let mut log = NotificationLog::new(3);
        let mut raised = RaisedAlerts::default();
        let products = [product(1, 2)];
        let found = scan(&products, &AlertSettings::default(), &raised);
        add_all(&mut log, &mut raised, found);

        for i in 0..3 {
            let n = log.compose(format!("n{i}"), "", NotificationCategory::Info, None, Utc::now());
            log.push(n);
        }
        assert!(log.entries().iter().all(|n| n.payload.is_none()));

        assert!(scan(&products, &AlertSettings::default(), &raised).is_empty());
    }

    #[test]
    fn test_more_products_than_log_capacity() {
        let mut log = NotificationLog::new(100);
        let mut raised = RaisedAlerts::default();
        let products: Vec<Product> = (1..=120).map(|id| product(id, 0)).collect();

        let first = scan(&products, &AlertSettings::default(), &raised);
        assert_eq!(first.len(), 120);
        add_all(&mut log, &mut raised, first);
        assert_eq!(log.len(), 100);
        assert_eq!(raised.len(), 120);

        assert!(scan(&products, &AlertSettings::default(), &raised).is_empty());
    }

    #[test]
    fn test_from_log_and_retain_products() {
        let mut log = NotificationLog::default();
        let mut seeded = RaisedAlerts::default();
        let found = scan(&[product(1, 0), product(2, 3)], &AlertSettings::default(), &seeded);
        add_all(&mut log, &mut seeded, found);

        let mut raised = RaisedAlerts::from_log(&log);
        assert_eq!(raised, seeded);

        assert!(raised.retain_products(&[product(2, 3)]));
        assert_eq!(raised.len(), 1);
        assert!(!raised.retain_products(&[product(2, 3)]));

        raised.clear();
        assert!(raised.is_empty());
    }

    #[test]
    fn test_disabled_kind_is_skipped() {
        let settings = AlertSettings {
            low_stock: false,
            ..AlertSettings::default()
        };
        let found = scan(&[product(1, 0), product(2, 2)], &settings, &RaisedAlerts::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].payload.kind, AlertKind::OutOfStock);
    }

    /// 6 → 5 → 0: one low alert, then one out alert; nothing retracted.
    #[test]
    fn test_transition_raises_each_kind_once() {
        let mut log = NotificationLog::default();
        let mut raised = RaisedAlerts::default();
        let settings = AlertSettings::default();

        assert!(scan(&[product(1, 6)], &settings, &raised).is_empty());

        let low = scan(&[product(1, 5)], &settings, &raised);
        assert_eq!(low.len(), 1);
        add_all(&mut log, &mut raised, low);

        let out = scan(&[product(1, 0)], &settings, &raised);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].payload.kind, AlertKind::OutOfStock);
        add_all(&mut log, &mut raised, out);

        assert_eq!(log.len(), 2);
        assert!(scan(&[product(1, 20)], &settings, &raised).is_empty());
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_stock_counts() {
        let (low, out) = stock_counts(&[product(1, 0), product(2, 1), product(3, 5), product(4, 9)]);
        assert_eq!((low, out), (2, 1));
    }
}
