/// Integration tests for filtering and pagination as the view consumes them.
///
/// Unit tests for the individual functions live in `src/table/`; these tests
/// check the end-to-end properties across filter, table state, and
/// pagination.
use optiview::model::{LabelSet, Namespace, Workload};
use optiview::table::{TableState, filter_namespaces, filter_workloads, paginate};

fn namespaces(names: &[&str]) -> Vec<Namespace> {
    names
        .iter()
        .map(|name| Namespace {
            name: name.to_string(),
            optimized: false,
        })
        .collect()
}

fn numbered_namespaces(count: usize) -> Vec<Namespace> {
    (0..count)
        .map(|i| Namespace {
            name: format!("ns-{i:02}"),
            optimized: false,
        })
        .collect()
}

fn workload(namespace: &str, name: &str, labels: &[(&str, &str)]) -> Workload {
    Workload {
        namespace: namespace.to_string(),
        name: name.to_string(),
        kind: "Deployment".to_string(),
        containers: Vec::new(),
        optimized: false,
        labels: if labels.is_empty() {
            None
        } else {
            Some(labels.iter().copied().collect::<LabelSet>())
        },
    }
}

// ---------------------------------------------------------------------------
// Filter properties
// ---------------------------------------------------------------------------

#[test]
fn namespace_filter_is_an_order_preserving_subsequence() {
    let all = namespaces(&["alpha", "Beta", "gamma", "alphabet", "delta"]);

    for query in ["", "a", "ALPHA", "bet", "zzz"] {
        let filtered = filter_namespaces(&all, query);

        // Subsequence: every kept item appears in the original, in order.
        let mut cursor = all.iter();
        for kept in &filtered {
            assert!(cursor.any(|ns| std::ptr::eq(ns, *kept)));
        }

        // Empty query keeps everything.
        if query.is_empty() {
            assert_eq!(filtered.len(), all.len());
        }
    }
}

#[test]
fn workload_membership_matches_the_and_of_both_tests() {
    let workloads = vec![
        workload("payments", "api", &[("tier", "backend")]),
        workload("web", "frontend", &[("tier", "web"), ("app", "shop")]),
        workload("web", "worker", &[]),
    ];

    for (text, label) in [
        ("", ""),
        ("web", ""),
        ("", "tier=web"),
        ("front", "app=shop"),
        ("worker", "tier=web"),
    ] {
        let filtered = filter_workloads(&workloads, text, label);
        for w in &workloads {
            let text_ok = text.is_empty()
                || w.name.to_lowercase().contains(&text.to_lowercase())
                || w.namespace.to_lowercase().contains(&text.to_lowercase());
            let label_ok = label.is_empty()
                || w.labels.as_ref().is_some_and(|l| {
                    !l.is_empty() && l.joined().to_lowercase().contains(&label.to_lowercase())
                });
            let expected = text_ok && label_ok;
            let present = filtered.iter().any(|kept| std::ptr::eq(*kept, w));
            assert_eq!(present, expected, "workload {} text={text:?} label={label:?}", w.name);
        }
    }
}

// ---------------------------------------------------------------------------
// Pagination across filter changes
// ---------------------------------------------------------------------------

#[test]
fn pagination_grid_over_twenty_five_items() {
    let all = numbered_namespaces(25);
    let filtered = filter_namespaces(&all, "");

    let page = paginate(&filtered, 1, 10);
    assert_eq!(page.visible.len(), 10);
    assert_eq!(page.total, 25);

    let page = paginate(&filtered, 3, 10);
    assert_eq!(page.visible.len(), 5);

    let page = paginate(&filtered, 4, 10);
    assert!(page.visible.is_empty());
    assert_eq!(page.total, 25);
}

#[test]
fn changing_the_query_resets_to_the_first_page() {
    let all = numbered_namespaces(40);
    let mut state = TableState::default();
    state.set_page(3);

    let filtered = filter_namespaces(&all, state.query());
    assert_eq!(paginate(&filtered, state.page(), state.page_size()).visible.len(), 10);

    // A narrower query invalidates the old page; the reset rule snaps the
    // next paginate call back to the front.
    state.set_query("ns-0");
    assert_eq!(state.page(), 1);

    let filtered = filter_namespaces(&all, state.query());
    let page = paginate(&filtered, state.page(), state.page_size());
    assert_eq!(page.total, 10);
    assert_eq!(page.visible[0].name, "ns-00");
}

#[test]
fn changing_page_size_resets_to_the_first_page() {
    let mut state = TableState::default();
    state.set_page(2);
    state.set_page_size(5);
    assert_eq!(state.page(), 1);
    assert_eq!(state.page_size(), 5);
}
