/// Scan field normalizer.
///
/// The scan endpoint went through a field rename upstream: the workload list
/// used to arrive as `deployments` and now arrives as `workloads`. Both
/// shapes are still live in the wild, so every accepted scan payload passes
/// through [`normalize_scan`] exactly once and the rest of the crate only
/// sees the canonical [`Scan`] shape.
use serde::Serialize;

use super::{Namespace, ScanResult, Workload};

/// Canonical scan shape with the workload field fallback resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scan {
    pub namespaces: Vec<Namespace>,
    pub workloads: Vec<Workload>,
}

/// Produce the canonical scan shape from a raw payload.
///
/// Pure: consumes the payload, touches nothing else, raises nothing. Unknown
/// fields were already dropped at deserialization.
pub fn normalize_scan(raw: ScanResult) -> Scan {
    Scan {
        namespaces: raw.namespaces,
        workloads: resolve_workloads(raw.workloads, raw.deployments),
    }
}

/// Ordered-preference resolver for the workload collection.
///
/// Priority is decided at the field level, not the content level:
///
/// 1. `workloads` present — use it, even when it is an empty list;
/// 2. otherwise `deployments` present — use it;
/// 3. otherwise — empty list.
pub fn resolve_workloads(
    primary: Option<Vec<Workload>>,
    secondary: Option<Vec<Workload>>,
) -> Vec<Workload> {
    match (primary, secondary) {
        (Some(workloads), _) => workloads,
        (None, Some(deployments)) => deployments,
        (None, None) => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
