/// Fetch orchestrator — owns the snapshots and drives the remote operations.
///
/// A [`Session`] holds everything one dashboard view needs: the three
/// optional snapshots (health, normalized scan, profile diff), the show-all
/// toggle, per-table filter state, and one [`OpState`] per remote operation.
/// Nothing here persists; dropping the session discards all of it.
///
/// # Operation lifecycle
///
/// Every operation walks `Idle -> InFlight -> Settled(ok|err)` and may be
/// re-triggered immediately after settling — there is no cooldown and no
/// dedup of concurrent triggers. State changes exactly once per operation,
/// at the point its response is applied: the whole snapshot is replaced,
/// never patched field-by-field. A failed fetch leaves the previously held
/// snapshot untouched and settles the flag as failed.
///
/// # Known limitation
///
/// Responses are applied in arrival order with no sequence numbers and no
/// cancellation, so the last response applied wins even if an older request
/// settles after a newer one (e.g. toggling show-all twice quickly). This
/// mirrors the service dashboard's behavior and is deliberate; callers that
/// need stricter ordering must serialize their own triggers.
use chrono::{DateTime, Utc};

use crate::client::{ApiError, OptimizerApi, UpdateRequest};
use crate::model::{DiffSnapshot, HealthSnapshot, Scan, ScanResult, normalize_scan};
use crate::table::TableState;
use crate::view::{self, DashboardView};

// ---------------------------------------------------------------------------
// Operation state machine
// ---------------------------------------------------------------------------

/// The remote operations tracked independently — never aggregated into one
/// "loading" flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Health,
    Scan,
    Diff,
    Install,
    Update,
}

/// Lifecycle state of one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OpState {
    /// Never triggered (or re-armed).
    #[default]
    Idle,
    /// Triggered, response not yet applied.
    InFlight,
    /// Settled successfully.
    Succeeded,
    /// Settled with the given error message.
    Failed(String),
}

impl OpState {
    pub fn is_in_flight(&self) -> bool {
        *self == Self::InFlight
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// One flag per operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct OpFlags {
    health: OpState,
    scan: OpState,
    diff: OpState,
    install: OpState,
    update: OpState,
}

impl OpFlags {
    fn get(&self, op: Operation) -> &OpState {
        match op {
            Operation::Health => &self.health,
            Operation::Scan => &self.scan,
            Operation::Diff => &self.diff,
            Operation::Install => &self.install,
            Operation::Update => &self.update,
        }
    }

    fn set(&mut self, op: Operation, state: OpState) {
        let slot = match op {
            Operation::Health => &mut self.health,
            Operation::Scan => &mut self.scan,
            Operation::Diff => &mut self.diff,
            Operation::Install => &mut self.install,
            Operation::Update => &mut self.update,
        };
        *slot = state;
    }
}

/// Result of [`Session::update_profiles`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The update request was sent and accepted.
    Applied,
    /// No diff snapshot has been loaded yet — nothing was sent.
    NoDiffLoaded,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One dashboard session over an [`OptimizerApi`] implementation.
pub struct Session<C: OptimizerApi> {
    client: C,
    health: Option<HealthSnapshot>,
    scan: Option<Scan>,
    diff: Option<DiffSnapshot>,
    show_all: bool,
    ops: OpFlags,
    /// Filter/pagination state for the namespaces table.
    pub namespaces_table: TableState,
    /// Filter/pagination state for the workloads table.
    pub workloads_table: TableState,
    last_refreshed_at: Option<DateTime<Utc>>,
}

impl<C: OptimizerApi> Session<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            health: None,
            scan: None,
            diff: None,
            show_all: false,
            ops: OpFlags::default(),
            namespaces_table: TableState::default(),
            workloads_table: TableState::default(),
            last_refreshed_at: None,
        }
    }

    /// Set the show-all toggle before any fetch has been triggered. Unlike
    /// [`set_show_all`](Self::set_show_all) this never fires a scan, so a
    /// freshly built session performs exactly one scan on start.
    pub fn with_show_all(mut self, show_all: bool) -> Self {
        self.show_all = show_all;
        self
    }

    // -- Accessors --

    /// The API implementation this session drives. Tests use this to reach
    /// their fake client.
    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn health(&self) -> Option<&HealthSnapshot> {
        self.health.as_ref()
    }

    pub fn scan(&self) -> Option<&Scan> {
        self.scan.as_ref()
    }

    pub fn diff(&self) -> Option<&DiffSnapshot> {
        self.diff.as_ref()
    }

    pub fn show_all(&self) -> bool {
        self.show_all
    }

    pub fn op_state(&self, op: Operation) -> &OpState {
        self.ops.get(op)
    }

    /// When the session last applied a successful fetch, if ever.
    pub fn last_refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.last_refreshed_at
    }

    /// Derive the renderable view from the current snapshots and table state.
    pub fn view(&self) -> DashboardView {
        view::build(
            self.health.as_ref(),
            self.scan.as_ref(),
            self.diff.as_ref(),
            &self.namespaces_table,
            &self.workloads_table,
        )
    }

    // -- Triggers --

    /// Session start: fire all three fetches, each independent. A failure in
    /// one never blocks the others.
    pub fn start(&mut self) {
        self.refresh_health();
        self.refresh_scan();
        self.refresh_diff();
    }

    /// Explicit user refresh: health and scan. The diff is only refreshed as
    /// part of the install/update flow.
    pub fn refresh(&mut self) {
        self.refresh_health();
        self.refresh_scan();
    }

    /// Flip the show-all toggle. Re-fires the scan only; health and diff are
    /// untouched.
    pub fn set_show_all(&mut self, show_all: bool) {
        if self.show_all == show_all {
            return;
        }
        self.show_all = show_all;
        self.refresh_scan();
    }

    pub fn refresh_health(&mut self) {
        self.ops.set(Operation::Health, OpState::InFlight);
        let result = self.client.fetch_health();
        self.apply_health(result);
    }

    pub fn refresh_scan(&mut self) {
        self.ops.set(Operation::Scan, OpState::InFlight);
        let result = self.client.fetch_scan(self.show_all);
        self.apply_scan(result);
    }

    pub fn refresh_diff(&mut self) {
        self.ops.set(Operation::Diff, OpState::InFlight);
        let result = self.client.fetch_diff();
        self.apply_diff(result);
    }

    // -- Response application (one atomic snapshot replacement each) --

    /// Apply a health response. On failure the previous snapshot is retained.
    pub fn apply_health(&mut self, result: Result<HealthSnapshot, ApiError>) {
        match result {
            Ok(snapshot) => {
                self.health = Some(snapshot);
                self.note_refresh();
                self.ops.set(Operation::Health, OpState::Succeeded);
            }
            Err(err) => self.settle_failed(Operation::Health, &err),
        }
    }

    /// Apply a scan response, normalizing the workload field fallback before
    /// the snapshot is accepted.
    pub fn apply_scan(&mut self, result: Result<ScanResult, ApiError>) {
        match result {
            Ok(raw) => {
                self.scan = Some(normalize_scan(raw));
                self.note_refresh();
                self.ops.set(Operation::Scan, OpState::Succeeded);
            }
            Err(err) => self.settle_failed(Operation::Scan, &err),
        }
    }

    /// Apply a diff response. On failure the previous snapshot is retained.
    pub fn apply_diff(&mut self, result: Result<DiffSnapshot, ApiError>) {
        match result {
            Ok(snapshot) => {
                self.diff = Some(snapshot);
                self.note_refresh();
                self.ops.set(Operation::Diff, OpState::Succeeded);
            }
            Err(err) => self.settle_failed(Operation::Diff, &err),
        }
    }

    // -- Mutating operations --

    /// Ask the service to install missing profiles/layers.
    ///
    /// On success, health, diff, and scan are all re-fetched so the view
    /// reflects the install. On transport failure the error is returned to
    /// the caller and no refresh is attempted.
    pub fn install_profiles(&mut self) -> Result<(), ApiError> {
        self.ops.set(Operation::Install, OpState::InFlight);
        match self.client.install_profiles() {
            Ok(()) => {
                self.ops.set(Operation::Install, OpState::Succeeded);
                self.refresh_after_mutation();
                Ok(())
            }
            Err(err) => {
                self.ops
                    .set(Operation::Install, OpState::Failed(err.to_string()));
                Err(err)
            }
        }
    }

    /// Apply every pending item from the loaded diff snapshot.
    ///
    /// A session that has not loaded a diff yet performs no request and
    /// reports [`UpdateOutcome::NoDiffLoaded`] — that is a precondition
    /// short-circuit, not an error. Refresh semantics match
    /// [`install_profiles`](Self::install_profiles).
    pub fn update_profiles(&mut self) -> Result<UpdateOutcome, ApiError> {
        let Some(diff) = &self.diff else {
            return Ok(UpdateOutcome::NoDiffLoaded);
        };
        let request = UpdateRequest::from_diff(diff);

        self.ops.set(Operation::Update, OpState::InFlight);
        match self.client.update_profiles(&request) {
            Ok(()) => {
                self.ops.set(Operation::Update, OpState::Succeeded);
                self.refresh_after_mutation();
                Ok(UpdateOutcome::Applied)
            }
            Err(err) => {
                self.ops
                    .set(Operation::Update, OpState::Failed(err.to_string()));
                Err(err)
            }
        }
    }

    // -- Internal --

    /// After a successful mutating call, re-sync everything the mutation may
    /// have touched.
    fn refresh_after_mutation(&mut self) {
        self.refresh_health();
        self.refresh_diff();
        self.refresh_scan();
    }

    fn settle_failed(&mut self, op: Operation, err: &ApiError) {
        eprintln!("[optiview] {err}");
        self.ops.set(op, OpState::Failed(err.to_string()));
    }

    fn note_refresh(&mut self) {
        self.last_refreshed_at = Some(Utc::now());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
//
// The integration suite in `tests/session_tests.rs` drives a full fake
// client. These unit tests cover the pieces that need no client at all.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_state_defaults_to_idle() {
        assert_eq!(OpState::default(), OpState::Idle);
        assert!(!OpState::Idle.is_in_flight());
    }

    #[test]
    fn op_flags_are_independent() {
        let mut flags = OpFlags::default();
        flags.set(Operation::Scan, OpState::InFlight);
        flags.set(Operation::Install, OpState::Failed("boom".to_string()));

        assert!(flags.get(Operation::Scan).is_in_flight());
        assert_eq!(flags.get(Operation::Health), &OpState::Idle);
        assert_eq!(flags.get(Operation::Diff), &OpState::Idle);
        assert_eq!(flags.get(Operation::Install).error(), Some("boom"));
        assert_eq!(flags.get(Operation::Update), &OpState::Idle);
    }

    #[test]
    fn failed_state_carries_message() {
        let state = OpState::Failed("scan request failed".to_string());
        assert_eq!(state.error(), Some("scan request failed"));
        assert_eq!(OpState::Succeeded.error(), None);
    }
}
