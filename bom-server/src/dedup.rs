//! Distinct part codes of an expanded BOM

use bom_common::models::{DedupedCode, HierarchyRow};
use std::collections::HashSet;

/// Every distinct code in row order, parent before child, numbered from 1
pub fn dedupe(rows: &[HierarchyRow]) -> Vec<DedupedCode> {
    let mut seen = HashSet::new();
    let mut codes = Vec::new();

    for row in rows {
        for code in [&row.parent_code, &row.child_code] {
            if seen.insert(code.as_str()) {
                codes.push(DedupedCode {
                    sequence_number: codes.len() + 1,
                    code: code.clone(),
                });
            }
        }
    }

    codes
}
