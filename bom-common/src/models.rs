//! Data model shared by the BOM service and its clients
//!
//! JSON field names follow the established wire format of the BOM API
//! (`parent-number`, `child-name-cn`, ...), so existing consumers keep working.

use serde::{Deserialize, Serialize};

/// Hierarchy-edge marker stored in the link-type column
pub const HIERARCHY_EDGE_MARKER: &str = "H";

/// Maximum expansion depth below the queried root
pub const MAX_EXPANSION_DEPTH: u32 = 10;

/// One parent→child edge of an expanded bill of materials
///
/// Rows are produced by the hierarchy resolver ordered by depth and then the
/// store's intra-level sequence. Deduplication numbers codes by first
/// occurrence, so that order must be preserved by every consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyRow {
    #[serde(rename = "parent-number")]
    pub parent_code: String,

    #[serde(rename = "parent-name")]
    pub parent_name: String,

    #[serde(
        rename = "parent-name-cn",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_name_translated: Option<String>,

    #[serde(rename = "par_pro_spec")]
    pub parent_spec: String,

    #[serde(rename = "child-number")]
    pub child_code: String,

    /// `None` when the catalog table has no entry for the child code
    #[serde(rename = "child-name")]
    pub child_name: Option<String>,

    #[serde(
        rename = "child-name-cn",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub child_name_translated: Option<String>,

    #[serde(rename = "sub_pro_spec")]
    pub child_spec: String,

    #[serde(rename = "child-quantity")]
    pub child_quantity: f64,

    /// Distance from the queried root (direct children are depth 1)
    pub depth: u32,
}

impl HierarchyRow {
    /// Child name if present and non-empty
    pub fn child_name_text(&self) -> Option<&str> {
        match self.child_name.as_deref() {
            Some(name) if !name.is_empty() => Some(name),
            Some(_) | None => None,
        }
    }

    /// Copy of this row with names replaced by their translations
    ///
    /// Used by the translated expansion, which shows a single name column.
    /// Names without a translation are kept as they are.
    pub fn localized(&self) -> HierarchyRow {
        HierarchyRow {
            parent_name: self
                .parent_name_translated
                .clone()
                .unwrap_or_else(|| self.parent_name.clone()),
            parent_name_translated: None,
            child_name: self
                .child_name_translated
                .clone()
                .or_else(|| self.child_name.clone()),
            child_name_translated: None,
            ..self.clone()
        }
    }
}

/// Row of the combined expansion: original and translated names side by side
///
/// Unlike [`HierarchyRow`], both translated-name fields are always written;
/// `child-name-cn` is `null` when the child has no name to translate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedRow {
    #[serde(rename = "parent-number")]
    pub parent_code: String,
    #[serde(rename = "parent-name")]
    pub parent_name: String,
    #[serde(rename = "parent-name-cn")]
    pub parent_name_translated: Option<String>,
    #[serde(rename = "par_pro_spec")]
    pub parent_spec: String,
    #[serde(rename = "child-number")]
    pub child_code: String,
    #[serde(rename = "child-name")]
    pub child_name: Option<String>,
    #[serde(rename = "child-name-cn")]
    pub child_name_translated: Option<String>,
    #[serde(rename = "sub_pro_spec")]
    pub child_spec: String,
    #[serde(rename = "child-quantity")]
    pub child_quantity: f64,
    pub depth: u32,
}

impl From<HierarchyRow> for CombinedRow {
    fn from(row: HierarchyRow) -> Self {
        Self {
            parent_code: row.parent_code,
            parent_name: row.parent_name,
            parent_name_translated: row.parent_name_translated,
            parent_spec: row.parent_spec,
            child_code: row.child_code,
            child_name: row.child_name,
            child_name_translated: row.child_name_translated,
            child_spec: row.child_spec,
            child_quantity: row.child_quantity,
            depth: row.depth,
        }
    }
}

/// A distinct part code numbered by first occurrence in the hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupedCode {
    #[serde(rename = "sequence-number")]
    pub sequence_number: usize,
    pub code: String,
}

/// Catalog verification outcome for one code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationStatus {
    /// Catalog reported an exact match
    #[serde(rename = "OK")]
    Present,
    /// No exact match, or the lookup failed
    #[serde(rename = "NOT")]
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    #[serde(rename = "sequence-number")]
    pub sequence_number: usize,
    pub code: String,
    pub status: VerificationStatus,
}

/// Prefix of the human-readable list of absent codes
pub const ABSENT_CODES_PREFIX: &str = "The products that are not app ";

/// Aggregate counts over a verification sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationSummary {
    #[serde(rename = "count-ok")]
    pub count_present: usize,
    #[serde(rename = "count-not")]
    pub count_absent: usize,
    #[serde(skip)]
    pub absent_codes: Vec<String>,
    /// Empty when every code is present
    #[serde(rename = "not-codes")]
    pub absent_message: String,
}

impl VerificationSummary {
    pub fn from_results(results: &[VerificationResult]) -> Self {
        let absent_codes: Vec<String> = results
            .iter()
            .filter(|r| r.status == VerificationStatus::Absent)
            .map(|r| r.code.clone())
            .collect();

        let absent_message = if absent_codes.is_empty() {
            String::new()
        } else {
            format!("{}{}", ABSENT_CODES_PREFIX, absent_codes.join(" + "))
        };

        Self {
            count_present: results.len() - absent_codes.len(),
            count_absent: absent_codes.len(),
            absent_codes,
            absent_message,
        }
    }
}
