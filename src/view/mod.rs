/// Reconciled view model — pure composition of the session's snapshots.
///
/// [`build`] takes whatever subset of the three snapshots has arrived (any
/// of them may still be unresolved) plus the two table states, and produces
/// the one structure the renderer consumes. No hidden state, no I/O, no
/// randomness: identical inputs produce identical views.
///
/// Defaults were already centralized at snapshot acceptance (serde defaults
/// in [`crate::model`]); this module only defaults at the whole-snapshot
/// level, when a fetch has not resolved yet.
use serde::Serialize;

use crate::model::{
    DiffSnapshot, HealthSnapshot, HealthState, HealthStats, Namespace, ProfileRef, Scan, Workload,
};
use crate::table::{TableState, filter_namespaces, filter_workloads, paginate};

/// Datasource token used in experiment identifiers when the health snapshot
/// reports none.
pub const FALLBACK_DATASOURCE: &str = "prometheus-1";

// ---------------------------------------------------------------------------
// View types
// ---------------------------------------------------------------------------

/// Everything the dashboard renders, derived and owned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// Service health state; `None` while the first health fetch is
    /// unresolved.
    pub status: Option<HealthState>,
    pub last_checked_at: Option<String>,
    pub datasources: Vec<String>,
    pub metadata_profiles: Vec<ProfileRef>,
    pub metric_profiles: Vec<ProfileRef>,
    pub layers: Vec<ProfileRef>,
    pub rulesets: Vec<ProfileRef>,
    pub stats: HealthStats,
    pub issues: Vec<String>,
    /// True only when the status is non-healthy AND issues are present.
    pub issues_visible: bool,
    /// True when a diff snapshot is loaded and any category has items.
    pub updates_available: bool,
    /// The pending items themselves, empty until a diff arrives.
    pub pending_updates: DiffSnapshot,
    pub namespaces: TableView<Namespace>,
    pub workloads: TableView<WorkloadRow>,
}

/// One filtered, paginated table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView<T> {
    /// Rows of the current page.
    pub rows: Vec<T>,
    /// Total matching rows across all pages.
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

/// A workload row with per-container navigation targets resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkloadRow {
    pub namespace: String,
    pub name: String,
    pub kind: String,
    pub optimized: bool,
    pub containers: Vec<ContainerRow>,
}

/// A container with its experiment cross-navigation link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerRow {
    pub name: String,
    pub image: String,
    pub experiment_name: String,
    pub experiment_url: String,
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Compose the renderable view from the current snapshots and table state.
pub fn build(
    health: Option<&HealthSnapshot>,
    scan: Option<&Scan>,
    diff: Option<&DiffSnapshot>,
    namespaces_table: &TableState,
    workloads_table: &TableState,
) -> DashboardView {
    let datasources = health.map(|h| h.datasources.clone()).unwrap_or_default();

    let issues = health.map(|h| h.issues.clone()).unwrap_or_default();
    let issues_visible =
        health.is_some_and(|h| !h.status.is_healthy()) && !issues.is_empty();

    let updates_available = diff.is_some_and(DiffSnapshot::has_updates);

    let empty_scan = Scan::default();
    let scan = scan.unwrap_or(&empty_scan);

    DashboardView {
        status: health.map(|h| h.status.clone()),
        last_checked_at: health.and_then(|h| h.last_checked_at.clone()),
        metadata_profiles: health.map(|h| h.metadata_profiles.clone()).unwrap_or_default(),
        metric_profiles: health.map(|h| h.metric_profiles.clone()).unwrap_or_default(),
        layers: health.map(|h| h.layers.clone()).unwrap_or_default(),
        rulesets: health.map(|h| h.rulesets.clone()).unwrap_or_default(),
        stats: health.map(|h| h.stats).unwrap_or_default(),
        issues,
        issues_visible,
        updates_available,
        pending_updates: diff.cloned().unwrap_or_default(),
        namespaces: namespace_table(&scan.namespaces, namespaces_table),
        workloads: workload_table(&scan.workloads, workloads_table, &datasources),
        datasources,
    }
}

fn namespace_table(namespaces: &[Namespace], state: &TableState) -> TableView<Namespace> {
    let filtered = filter_namespaces(namespaces, state.query());
    let page = paginate(&filtered, state.page(), state.page_size());
    TableView {
        rows: page.visible.iter().map(|ns| (*ns).clone()).collect(),
        total: page.total,
        page: state.page(),
        page_size: state.page_size(),
    }
}

fn workload_table(
    workloads: &[Workload],
    state: &TableState,
    datasources: &[String],
) -> TableView<WorkloadRow> {
    let filtered = filter_workloads(workloads, state.query(), state.label_query());
    let page = paginate(&filtered, state.page(), state.page_size());
    let rows = page
        .visible
        .iter()
        .map(|workload| workload_row(workload, datasources))
        .collect();
    TableView {
        rows,
        total: page.total,
        page: state.page(),
        page_size: state.page_size(),
    }
}

fn workload_row(workload: &Workload, datasources: &[String]) -> WorkloadRow {
    let containers = workload
        .containers
        .iter()
        .map(|container| {
            let experiment_name = experiment_name(
                datasources,
                &workload.namespace,
                &workload.name,
                &workload.kind,
                &container.name,
            );
            let experiment_url = experiments_url(&experiment_name);
            ContainerRow {
                name: container.name.clone(),
                image: container.image.clone(),
                experiment_name,
                experiment_url,
            }
        })
        .collect();

    WorkloadRow {
        namespace: workload.namespace.clone(),
        name: workload.name.clone(),
        kind: workload.kind.clone(),
        optimized: workload.optimized,
        containers,
    }
}

// ---------------------------------------------------------------------------
// Cross-navigation
// ---------------------------------------------------------------------------

/// Compose the experiment identifier the experiments view keys on:
/// `{datasource}|default|{namespace}|{workload}({lowercased type})|{container}`.
///
/// The datasource is the first entry of the health datasource list, falling
/// back to [`FALLBACK_DATASOURCE`] when the list is empty.
pub fn experiment_name(
    datasources: &[String],
    namespace: &str,
    workload: &str,
    kind: &str,
    container: &str,
) -> String {
    let datasource = datasources
        .first()
        .map_or(FALLBACK_DATASOURCE, String::as_str);
    format!(
        "{datasource}|default|{namespace}|{workload}({})|{container}",
        kind.to_lowercase()
    )
}

/// Link to the experiments view for one composed identifier. URL
/// construction only — no request is made and no encoding is applied, per
/// the experiments view's contract.
pub fn experiments_url(experiment_name: &str) -> String {
    format!("/experiments?experiment_name={experiment_name}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Container;

    fn health_with(datasources: &[&str], status: HealthState, issues: &[&str]) -> HealthSnapshot {
        HealthSnapshot {
            status,
            last_checked_at: Some("2026-08-30T10:00:00Z".to_string()),
            datasources: datasources.iter().map(|s| s.to_string()).collect(),
            metadata_profiles: Vec::new(),
            metric_profiles: Vec::new(),
            layers: Vec::new(),
            rulesets: Vec::new(),
            issues: issues.iter().map(|s| s.to_string()).collect(),
            stats: HealthStats::default(),
        }
    }

    #[test]
    fn experiment_name_uses_first_datasource() {
        let name = experiment_name(
            &["prom-1".to_string()],
            "ns",
            "app",
            "Deployment",
            "web",
        );
        assert_eq!(name, "prom-1|default|ns|app(deployment)|web");
    }

    #[test]
    fn experiment_name_falls_back_when_no_datasources() {
        let name = experiment_name(&[], "ns", "app", "Deployment", "web");
        assert_eq!(name, "prometheus-1|default|ns|app(deployment)|web");
    }

    #[test]
    fn experiments_url_is_plain_query_parameter() {
        assert_eq!(
            experiments_url("prom-1|default|ns|app(deployment)|web"),
            "/experiments?experiment_name=prom-1|default|ns|app(deployment)|web"
        );
    }

    #[test]
    fn view_with_no_snapshots_renders_defaults() {
        let view = build(
            None,
            None,
            None,
            &TableState::default(),
            &TableState::default(),
        );
        assert_eq!(view.status, None);
        assert!(view.datasources.is_empty());
        assert_eq!(view.stats, HealthStats::default());
        assert!(!view.issues_visible);
        assert!(!view.updates_available);
        assert_eq!(view.namespaces.total, 0);
        assert_eq!(view.workloads.total, 0);
    }

    #[test]
    fn issues_hidden_while_healthy_even_with_issue_text() {
        let health = health_with(&[], HealthState::Healthy, &["transient warning"]);
        let view = build(
            Some(&health),
            None,
            None,
            &TableState::default(),
            &TableState::default(),
        );
        assert!(!view.issues_visible);
    }

    #[test]
    fn issues_hidden_when_unhealthy_but_empty() {
        let health = health_with(&[], HealthState::Unhealthy, &[]);
        let view = build(
            Some(&health),
            None,
            None,
            &TableState::default(),
            &TableState::default(),
        );
        assert!(!view.issues_visible);
    }

    #[test]
    fn issues_visible_when_unhealthy_with_issues() {
        let health = health_with(&[], HealthState::Unhealthy, &["datasource unreachable"]);
        let view = build(
            Some(&health),
            None,
            None,
            &TableState::default(),
            &TableState::default(),
        );
        assert!(view.issues_visible);
    }

    #[test]
    fn updates_available_requires_loaded_nonempty_diff() {
        let empty = DiffSnapshot::default();
        let view = build(None, None, Some(&empty), &TableState::default(), &TableState::default());
        assert!(!view.updates_available);

        let pending = DiffSnapshot {
            metric_profiles: vec![ProfileRef::new("p1")],
            ..Default::default()
        };
        let view = build(None, None, Some(&pending), &TableState::default(), &TableState::default());
        assert!(view.updates_available);
        assert_eq!(view.pending_updates, pending);
    }

    #[test]
    fn workload_rows_resolve_container_links() {
        let health = health_with(&["prom-1"], HealthState::Healthy, &[]);
        let scan = Scan {
            namespaces: Vec::new(),
            workloads: vec![Workload {
                namespace: "ns".to_string(),
                name: "app".to_string(),
                kind: "Deployment".to_string(),
                containers: vec![Container {
                    name: "web".to_string(),
                    image: "nginx:latest".to_string(),
                }],
                optimized: true,
                labels: None,
            }],
        };

        let view = build(
            Some(&health),
            Some(&scan),
            None,
            &TableState::default(),
            &TableState::default(),
        );
        assert_eq!(view.workloads.total, 1);
        let container = &view.workloads.rows[0].containers[0];
        assert_eq!(
            container.experiment_name,
            "prom-1|default|ns|app(deployment)|web"
        );
        assert_eq!(
            container.experiment_url,
            "/experiments?experiment_name=prom-1|default|ns|app(deployment)|web"
        );
    }

    #[test]
    fn table_view_reports_filtered_total_not_page_len() {
        let namespaces: Vec<Namespace> = (0..25)
            .map(|i| Namespace {
                name: format!("ns-{i}"),
                optimized: false,
            })
            .collect();
        let scan = Scan {
            namespaces,
            workloads: Vec::new(),
        };
        let mut state = TableState::default();
        state.set_page(3);

        let view = build(None, Some(&scan), None, &state, &TableState::default());
        assert_eq!(view.namespaces.total, 25);
        assert_eq!(view.namespaces.rows.len(), 5);
        assert_eq!(view.namespaces.page, 3);
    }
}
