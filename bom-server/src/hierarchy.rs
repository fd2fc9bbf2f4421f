//! Hierarchy resolver
//!
//! Expands a root part code into its ordered parent/child rows, bounded at
//! [`MAX_EXPANSION_DEPTH`] levels, and enriches every code with its name from
//! the item catalog table.
//!
//! The ordering contract (depth ascending, then the store's intra-level
//! sequence) is enforced here rather than trusted from the store, because
//! code deduplication numbers codes by first occurrence.

use async_trait::async_trait;
use bom_common::models::{HierarchyRow, HIERARCHY_EDGE_MARKER, MAX_EXPANSION_DEPTH};
use bom_common::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Raw edge returned by the recursive store query
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    /// Intra-level sequence, major part
    pub document_no: String,
    /// Intra-level sequence, minor part
    pub line_no: i64,
    pub parent_code: String,
    pub child_code: String,
    pub quantity: f64,
    pub depth: u32,
}

/// Name/catalog table entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemRecord {
    pub name: Option<String>,
    pub spec: Option<String>,
}

/// Relational store holding the hierarchy and item tables
#[async_trait]
pub trait HierarchyStore: Send + Sync {
    /// Recursive expansion below `root_code`
    ///
    /// Only edges tagged with `edge_marker` participate, at the root and at
    /// every recursive step. Edges deeper than `max_depth` are excluded.
    async fn fetch_edges(
        &self,
        root_code: &str,
        edge_marker: &str,
        max_depth: u32,
    ) -> Result<Vec<EdgeRecord>>;

    /// Item catalog entry for a single code
    async fn lookup_item(&self, code: &str) -> Result<Option<ItemRecord>>;
}

/// Bounded-depth BOM expansion over a [`HierarchyStore`]
#[derive(Clone)]
pub struct HierarchyResolver {
    store: Arc<dyn HierarchyStore>,
}

impl HierarchyResolver {
    pub fn new(store: Arc<dyn HierarchyStore>) -> Self {
        Self { store }
    }

    /// Expand `root_code` into ordered, name-enriched hierarchy rows
    ///
    /// A root without hierarchy edges yields an empty vector. Store failures
    /// abort the expansion.
    pub async fn expand(&self, root_code: &str) -> Result<Vec<HierarchyRow>> {
        let mut edges = self
            .store
            .fetch_edges(root_code, HIERARCHY_EDGE_MARKER, MAX_EXPANSION_DEPTH)
            .await?;

        let fetched = edges.len();
        edges.retain(|edge| (1..=MAX_EXPANSION_DEPTH).contains(&edge.depth));
        if edges.len() != fetched {
            debug!(
                root_code = %root_code,
                dropped = fetched - edges.len(),
                "Dropped edges outside the expansion depth"
            );
        }

        // Stable: equal keys keep the store's order
        edges.sort_by(|a, b| {
            a.depth
                .cmp(&b.depth)
                .then_with(|| a.document_no.cmp(&b.document_no))
                .then_with(|| a.line_no.cmp(&b.line_no))
        });

        let mut items: HashMap<String, Option<ItemRecord>> = HashMap::new();
        let mut rows = Vec::with_capacity(edges.len());

        for edge in edges {
            let parent_code = edge.parent_code.trim().to_string();
            let child_code = edge.child_code.trim().to_string();

            let parent = self.item(&mut items, &parent_code).await?;
            let child = self.item(&mut items, &child_code).await?;

            rows.push(HierarchyRow {
                parent_name: parent
                    .as_ref()
                    .and_then(|item| item.name.as_deref())
                    .map(|name| name.trim().to_string())
                    .unwrap_or_default(),
                parent_name_translated: None,
                parent_spec: spec_text(parent.as_ref()),
                child_name: child
                    .as_ref()
                    .and_then(|item| item.name.as_deref())
                    .map(|name| name.trim().to_string()),
                child_name_translated: None,
                child_spec: spec_text(child.as_ref()),
                child_quantity: edge.quantity,
                depth: edge.depth,
                parent_code,
                child_code,
            });
        }

        debug!(
            root_code = %root_code,
            rows = rows.len(),
            distinct_items = items.len(),
            "Hierarchy expanded"
        );

        Ok(rows)
    }

    /// Item lookup memoised for the duration of one expansion
    async fn item(
        &self,
        cache: &mut HashMap<String, Option<ItemRecord>>,
        code: &str,
    ) -> Result<Option<ItemRecord>> {
        if let Some(item) = cache.get(code) {
            return Ok(item.clone());
        }
        let item = self.store.lookup_item(code).await?;
        cache.insert(code.to_string(), item.clone());
        Ok(item)
    }
}

fn spec_text(item: Option<&ItemRecord>) -> String {
    item.and_then(|item| item.spec.as_deref())
        .map(|spec| spec.trim().to_string())
        .unwrap_or_default()
}
