//! # Stock Levels
//!
//! One classification serves both the alert scan and the product list's
//! stock filter.
//!
//! ```text
//!   quantity:   0        1 ─────────── 5        6 ──────────►
//!               │        │             │        │
//!               ▼        └──────┬──────┘        ▼
//!          OutOfStock          Low           InStock
//! ```

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ts_rs::TS;

use crate::types::AlertKind;
use crate::LOW_STOCK_THRESHOLD;

/// Stock band of a single product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockLevel {
    InStock,
    Low,
    OutOfStock,
}

impl StockLevel {
    /// Alert kind raised for this level, if any.
    pub const fn alert_kind(&self) -> Option<AlertKind> {
        match self {
            StockLevel::InStock => None,
            StockLevel::Low => Some(AlertKind::LowStock),
            StockLevel::OutOfStock => Some(AlertKind::OutOfStock),
        }
    }
}

/// Classifies a stock quantity.
///
/// Negative quantities cannot come out of a settlement but may arrive in an
/// imported file; they count as out of stock.
pub fn classify(quantity: i64) -> StockLevel {
    if quantity <= 0 {
        StockLevel::OutOfStock
    } else if quantity <= LOW_STOCK_THRESHOLD {
        StockLevel::Low
    } else {
        StockLevel::InStock
    }
}

/// Stock filter of the product list.
///
/// `InStock` matches anything with at least one unit, like the original
/// product tab does; `LowStock` and `OutOfStock` match their band exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum StockFilter {
    #[default]
    All,
    InStock,
    LowStock,
    OutOfStock,
}

impl StockFilter {
    pub fn matches(&self, quantity: i64) -> bool {
        match self {
            StockFilter::All => true,
            StockFilter::InStock => quantity > 0,
            StockFilter::LowStock => classify(quantity) == StockLevel::Low,
            StockFilter::OutOfStock => classify(quantity) == StockLevel::OutOfStock,
        }
    }
}

impl FromStr for StockFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(StockFilter::All),
            "instock" => Ok(StockFilter::InStock),
            "lowstock" => Ok(StockFilter::LowStock),
            "outofstock" => Ok(StockFilter::OutOfStock),
            other => Err(format!("unknown stock filter: {other}")),
        }
    }
}
