//! # Receipt Rendering
//!
//! Plain-text receipt for a sale and printable text for a document. Output
//! depends only on the record and the currency symbol, so a receipt can be
//! reprinted from history byte-for-byte.

use std::fmt::Write;

use crate::types::{Document, Sale};
use crate::DEFAULT_CUSTOMER_NAME;

const RULE: &str = "========================================";
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders a sale receipt.
///
/// ## Example
/// ```text
/// ========================================
///              SALES RECEIPT
/// ========================================
/// Date: 2024-03-01 12:00:00
/// Customer: Anna
/// Payment method: Card
/// ========================================
/// ITEMS:
/// Pen x2 = 25.00 ₽
/// ========================================
/// TOTAL: 25.00 ₽
/// ========================================
/// Thank you for your purchase!
/// ```
pub fn render_receipt(sale: &Sale, currency_symbol: &str) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "             SALES RECEIPT");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Date: {}", sale.date.format(DATE_FORMAT));
    let _ = writeln!(out, "Customer: {}", sale.customer_name);
    let _ = writeln!(out, "Payment method: {}", sale.payment_method.label());
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "ITEMS:");
    for item in &sale.items {
        let _ = writeln!(
            out,
            "{} x{} = {}",
            item.name,
            item.quantity,
            item.line_total().format_with(currency_symbol)
        );
    }
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "TOTAL: {}", sale.total_amount.format_with(currency_symbol));
    let _ = writeln!(out, "{RULE}");
    out.push_str("Thank you for your purchase!");
    out
}

/// Renders a document for printing or saving.
pub fn render_document(document: &Document) -> String {
    let created = document
        .created_at
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string());
    let recipient = document
        .recipient
        .as_deref()
        .filter(|r| !r.trim().is_empty())
        .unwrap_or(DEFAULT_CUSTOMER_NAME);

    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "{}", document.document_type.label().to_uppercase());
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Title: {}", document.title);
    let _ = writeln!(out, "Created: {created}");
    let _ = writeln!(out, "Status: {}", document.status.label());
    let _ = writeln!(out, "Recipient: {recipient}");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "CONTENT:");
    let _ = writeln!(out, "{}", document.content);
    out.push_str(RULE);
    out
}

/// Suggested file name for a saved receipt: `receipt_2024-03-01T12-00-00Z.txt`.
pub fn receipt_file_name(sale: &Sale) -> String {
    let stamp = sale
        .date
        .to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
        .replace(':', "-");
    format!("receipt_{stamp}.txt")
}
