//! Applies name translation to hierarchy rows

use bom_common::models::HierarchyRow;
use std::collections::HashSet;

use super::TranslationTables;

/// Translate parent and child names of every row
///
/// The parent name is resolved against the parent code; the child name only
/// when present and non-empty, against the child code.
pub fn apply(rows: &[HierarchyRow], tables: &TranslationTables) -> Vec<HierarchyRow> {
    translate_rows(rows, tables, |_| {})
}

/// [`apply`], also returning every code with at least one failed resolution
///
/// Codes are listed once each, in order of their first failure, whether they
/// failed as a parent or as a child.
pub fn apply_with_tracking(
    rows: &[HierarchyRow],
    tables: &TranslationTables,
) -> (Vec<HierarchyRow>, Vec<String>) {
    let mut seen = HashSet::new();
    let mut untranslated = Vec::new();

    let translated = translate_rows(rows, tables, |code| {
        if !code.is_empty() && seen.insert(code.to_string()) {
            untranslated.push(code.to_string());
        }
    });

    (translated, untranslated)
}

fn translate_rows(
    rows: &[HierarchyRow],
    tables: &TranslationTables,
    mut on_miss: impl FnMut(&str),
) -> Vec<HierarchyRow> {
    rows.iter()
        .map(|row| {
            let parent = tables.resolve(&row.parent_name, &row.parent_code);
            if !parent.translated {
                on_miss(&row.parent_code);
            }

            let child = row.child_name_text().map(|name| {
                let child = tables.resolve(name, &row.child_code);
                if !child.translated {
                    on_miss(&row.child_code);
                }
                child.text
            });

            HierarchyRow {
                parent_name_translated: Some(parent.text),
                child_name_translated: child,
                ..row.clone()
            }
        })
        .collect()
}
