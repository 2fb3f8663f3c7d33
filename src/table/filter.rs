/// Text and label filtering over scan results.
///
/// Both filters are stable: they keep the input order and never reorder. An
/// empty query matches everything, so the unfiltered table is just the
/// filtered table with empty state.
use crate::model::{Namespace, Workload};

/// Keep namespaces whose name contains `query` as a case-insensitive
/// substring.
pub fn filter_namespaces<'a>(namespaces: &'a [Namespace], query: &str) -> Vec<&'a Namespace> {
    let needle = query.to_lowercase();
    namespaces
        .iter()
        .filter(|ns| contains_ci(&ns.name, &needle))
        .collect()
}

/// Keep workloads passing both the text test and the label test.
///
/// Text test: name OR namespace contains `text_query` (case-insensitive
/// substring, empty matches all).
///
/// Label test: `label_query` empty always passes; otherwise the workload must
/// have a non-empty label set whose serialized `key=value` form (pairs joined
/// by single spaces, insertion order) contains the query case-insensitively.
/// A workload without labels fails any non-empty label query.
pub fn filter_workloads<'a>(
    workloads: &'a [Workload],
    text_query: &str,
    label_query: &str,
) -> Vec<&'a Workload> {
    let text_needle = text_query.to_lowercase();
    let label_needle = label_query.to_lowercase();

    workloads
        .iter()
        .filter(|w| {
            let text_hit = contains_ci(&w.name, &text_needle) || contains_ci(&w.namespace, &text_needle);
            text_hit && label_hit(w, &label_needle)
        })
        .collect()
}

/// Case-insensitive substring test. `needle` must already be lowercased.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(needle)
}

/// Label test against an already-lowercased needle.
fn label_hit(workload: &Workload, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    match &workload.labels {
        Some(labels) if !labels.is_empty() => labels.joined().to_lowercase().contains(needle),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
