//! Shared fixtures for command tests.

use std::sync::Arc;

use crate::context::AppContext;
use crate::state::AppConfig;
use storage_alerts::NoOpEmitter;
use storage_core::{Money, Product};
use storage_db::{Database, DbConfig};

/// Context over a fresh in-memory database, scheduler not started.
pub(crate) async fn test_context() -> AppContext {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    AppContext::with_database(AppConfig::default(), db, Arc::new(NoOpEmitter))
        .await
        .unwrap()
}

/// Stores a product with the given stock, priced 1.00 / 2.50.
pub(crate) async fn seed_product(ctx: &AppContext, name: &str, quantity: i64) -> Product {
    ctx.db()
        .records::<Product>()
        .create(&Product::new(name, Money::from_cents(100), Money::from_cents(250), quantity))
        .await
        .unwrap()
}
