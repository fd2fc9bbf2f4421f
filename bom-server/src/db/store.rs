//! SQLite implementation of the hierarchy store

use async_trait::async_trait;
use bom_common::Result;
use sqlx::SqlitePool;

use crate::hierarchy::{EdgeRecord, HierarchyStore, ItemRecord};

/// Recursive expansion: ?1 root code, ?2 edge marker, ?3 depth cap
///
/// Codes are compared trimmed because the ERP pads code columns.
const EXPANSION_QUERY: &str = r#"
WITH RECURSIVE expansion(document_no, line_no, parent_code, child_code, quantity, depth) AS (
    SELECT CAST(document_no AS TEXT), line_no, parent_code, child_code, quantity, 1
    FROM bom_links
    WHERE TRIM(parent_code) = TRIM(?1) AND link_type = ?2

    UNION ALL

    SELECT CAST(l.document_no AS TEXT), l.line_no, l.parent_code, l.child_code, l.quantity, e.depth + 1
    FROM bom_links l
    INNER JOIN expansion e ON TRIM(l.parent_code) = TRIM(e.child_code)
    WHERE e.depth < ?3 AND l.link_type = ?2
)
SELECT document_no, line_no, parent_code, child_code, CAST(quantity AS REAL), depth
FROM expansion
ORDER BY depth ASC, document_no ASC, line_no ASC
"#;

const ITEM_QUERY: &str = "SELECT name, spec FROM items WHERE TRIM(code) = TRIM(?1) LIMIT 1";

type EdgeTuple = (
    Option<String>,
    i64,
    Option<String>,
    Option<String>,
    Option<f64>,
    i64,
);

/// Hierarchy store backed by an SQLite pool
#[derive(Clone)]
pub struct SqliteHierarchyStore {
    pool: SqlitePool,
}

impl SqliteHierarchyStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HierarchyStore for SqliteHierarchyStore {
    async fn fetch_edges(
        &self,
        root_code: &str,
        edge_marker: &str,
        max_depth: u32,
    ) -> Result<Vec<EdgeRecord>> {
        let rows = sqlx::query_as::<_, EdgeTuple>(EXPANSION_QUERY)
            .bind(root_code)
            .bind(edge_marker)
            .bind(i64::from(max_depth))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(
                |(document_no, line_no, parent_code, child_code, quantity, depth)| EdgeRecord {
                    document_no: document_no.unwrap_or_default(),
                    line_no,
                    parent_code: parent_code.unwrap_or_default(),
                    child_code: child_code.unwrap_or_default(),
                    quantity: quantity.unwrap_or_default(),
                    depth: u32::try_from(depth).unwrap_or(u32::MAX),
                },
            )
            .collect())
    }

    async fn lookup_item(&self, code: &str) -> Result<Option<ItemRecord>> {
        let row = sqlx::query_as::<_, (Option<String>, Option<String>)>(ITEM_QUERY)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(name, spec)| ItemRecord { name, spec }))
    }
}
