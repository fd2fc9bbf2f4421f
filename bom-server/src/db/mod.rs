//! Database access layer for bom-server
//!
//! The service only reads from the ERP store. Two tables are used:
//! `bom_links` (one row per parent→child edge) and `items` (code → name).

use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

mod store;
pub use store::SqliteHierarchyStore;

/// Tables the service expects to find in the store
///
/// `link_type = 'H'` marks hierarchy edges. `(document_no, line_no)` orders
/// edges within one depth level.
pub const STORE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS bom_links (
    document_no TEXT NOT NULL,
    line_no     INTEGER NOT NULL,
    parent_code TEXT NOT NULL,
    child_code  TEXT NOT NULL,
    quantity    REAL NOT NULL DEFAULT 0,
    link_type   TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_bom_links_parent ON bom_links (parent_code);

CREATE TABLE IF NOT EXISTS items (
    code TEXT PRIMARY KEY,
    name TEXT,
    spec TEXT
);
"#;

/// Connect to the hierarchy store
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect(database_url)
        .await
        .with_context(|| format!("Failed to connect to database: {}", database_url))?;

    // Fail at startup, not on the first request
    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .context("Database ping failed")?;

    Ok(pool)
}
