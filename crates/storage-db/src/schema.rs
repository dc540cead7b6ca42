//! # Schema Versioning
//!
//! Creates the collection tables and tracks the schema version in
//! `PRAGMA user_version`.
//!
//! ## How Upgrades Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Upgrade Process                                    │
//! │                                                                         │
//! │  Database::new()                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PRAGMA user_version ──► current                                       │
//! │       │                                                                 │
//! │       ├── current == SCHEMA_VERSION? Done, nothing written             │
//! │       ├── current >  SCHEMA_VERSION? Reject (no downgrade)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │    v1: warehouse, suppliers, sales, documents   ✓ (skipped if applied) │
//! │    v2: users, activity, settings                ⬜ (runs)               │
//! │    PRAGMA user_version = SCHEMA_VERSION                                │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Adding a Version
//!
//! 1. Append a step to `STEPS` with the next version number
//! 2. Bump `SCHEMA_VERSION`
//! 3. Only ever create: `CREATE TABLE IF NOT EXISTS`, never drop or alter
//!    existing collections

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

/// Schema version this build writes.
pub const SCHEMA_VERSION: i64 = 2;

/// One version bump.
struct SchemaStep {
    version: i64,
    description: &'static str,
    statements: &'static [&'static str],
}

const STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        description: "core collections",
        statements: &[
            "CREATE TABLE IF NOT EXISTS warehouse (id INTEGER PRIMARY KEY AUTOINCREMENT, data TEXT NOT NULL)",
            "CREATE TABLE IF NOT EXISTS suppliers (id INTEGER PRIMARY KEY AUTOINCREMENT, data TEXT NOT NULL)",
            "CREATE TABLE IF NOT EXISTS sales (id INTEGER PRIMARY KEY AUTOINCREMENT, data TEXT NOT NULL)",
            "CREATE TABLE IF NOT EXISTS documents (id INTEGER PRIMARY KEY AUTOINCREMENT, data TEXT NOT NULL)",
        ],
    },
    SchemaStep {
        version: 2,
        description: "users, activity log and settings",
        statements: &[
            "CREATE TABLE IF NOT EXISTS users (id INTEGER PRIMARY KEY AUTOINCREMENT, data TEXT NOT NULL)",
            "CREATE TABLE IF NOT EXISTS activity (id INTEGER PRIMARY KEY AUTOINCREMENT, data TEXT NOT NULL)",
            "CREATE TABLE IF NOT EXISTS settings (key TEXT PRIMARY KEY, value TEXT NOT NULL, updated_at TEXT NOT NULL)",
        ],
    },
];

/// Reads `PRAGMA user_version`.
pub async fn current_version(pool: &SqlitePool) -> DbResult<i64> {
    let version: i64 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await?;
    Ok(version)
}

/// Brings the schema up to [`SCHEMA_VERSION`].
///
/// ## Returns
/// * `Ok(applied)` - versions applied by this call, empty if the database
///   was already current
/// * `Err(DbError::UnsupportedVersion)` - database is newer than this build
/// * `Err(DbError::SchemaFailed)` - a step failed; nothing was changed
pub async fn ensure_schema(pool: &SqlitePool) -> DbResult<Vec<i64>> {
    let current = current_version(pool).await?;

    if current == SCHEMA_VERSION {
        debug!(version = current, "Schema is current");
        return Ok(Vec::new());
    }

    if current > SCHEMA_VERSION {
        return Err(DbError::UnsupportedVersion {
            found: current,
            supported: SCHEMA_VERSION,
        });
    }

    let applied = apply_steps(pool, current)
        .await
        .map_err(|e| DbError::SchemaFailed(e.to_string()))?;

    info!(from = current, to = SCHEMA_VERSION, "Schema upgraded");
    Ok(applied)
}

async fn apply_steps(pool: &SqlitePool, current: i64) -> DbResult<Vec<i64>> {
    let mut tx = pool.begin().await?;
    let mut applied = Vec::new();

    for step in STEPS.iter().filter(|s| s.version > current) {
        debug!(version = step.version, description = step.description, "Applying schema step");
        for statement in step.statements {
            sqlx::query(*statement).execute(&mut *tx).await?;
        }
        applied.push(step.version);
    }

    // PRAGMA does not take bind parameters; the value is a compile-time integer
    sqlx::query(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(applied)
}

// =============================================================================
// Unit Tests
// =============================================================================
