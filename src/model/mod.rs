/// Wire types for the optimizer service endpoints.
///
/// Three independently-fetched resources, each replaced wholesale on every
/// successful refresh:
///
/// - [`HealthSnapshot`] — `GET /health/kruize`
/// - [`DiffSnapshot`] — `GET /profiles/diff` (items whose installed version
///   lags the available version; empty collections mean nothing to update)
/// - [`ScanResult`] — `GET /scan` (raw; see [`normalize`] for the canonical
///   shape)
///
/// Deserialization is tolerant by design: absent collections become empty,
/// absent counters become zero, unknown fields are ignored. That is the one
/// place defaults are applied — downstream code never re-defaults at read
/// sites.
pub mod normalize;

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use normalize::{Scan, normalize_scan};

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

/// Service health state as reported by the health endpoint.
///
/// The wire value is a free-form string; anything other than the two known
/// values is preserved verbatim in [`HealthState::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HealthState {
    Healthy,
    Unhealthy,
    Other(String),
}

impl HealthState {
    pub fn is_healthy(&self) -> bool {
        *self == Self::Healthy
    }
}

impl From<String> for HealthState {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "HEALTHY" => Self::Healthy,
            "UNHEALTHY" => Self::Unhealthy,
            _ => Self::Other(raw),
        }
    }
}

impl From<HealthState> for String {
    fn from(state: HealthState) -> Self {
        state.to_string()
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => f.write_str("HEALTHY"),
            Self::Unhealthy => f.write_str("UNHEALTHY"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

/// A named profile or layer, with a version where the service reports one
/// (layers and rulesets carry no version on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRef {
    pub name: String,
    #[serde(
        default,
        rename = "profile_version",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,
}

impl ProfileRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    pub fn versioned(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: Some(version.into()),
        }
    }
}

/// Lifetime counters from the health endpoint. Every field defaults to zero
/// so a partial or absent `stats` object still yields usable numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStats {
    #[serde(default)]
    pub total_jobs_created: u64,
    #[serde(default)]
    pub total_experiments_created: u64,
    #[serde(default)]
    pub total_experiments_processed: u64,
}

/// Full health report. Produced by one fetch, replaced atomically — there are
/// no partial updates to an accepted snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    pub status: HealthState,
    #[serde(default, rename = "lastCheckedAt")]
    pub last_checked_at: Option<String>,
    #[serde(default)]
    pub datasources: Vec<String>,
    #[serde(default)]
    pub metadata_profiles: Vec<ProfileRef>,
    #[serde(default)]
    pub metric_profiles: Vec<ProfileRef>,
    #[serde(default)]
    pub layers: Vec<ProfileRef>,
    #[serde(default)]
    pub rulesets: Vec<ProfileRef>,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub stats: HealthStats,
}

// ---------------------------------------------------------------------------
// Profile diff
// ---------------------------------------------------------------------------

/// Profiles and layers whose installed version is behind the available one.
/// Same item shape as the profile portion of [`HealthSnapshot`], but fetched
/// separately and with its own staleness.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffSnapshot {
    #[serde(default)]
    pub metadata_profiles: Vec<ProfileRef>,
    #[serde(default)]
    pub metric_profiles: Vec<ProfileRef>,
    #[serde(default)]
    pub layers: Vec<ProfileRef>,
}

impl DiffSnapshot {
    /// True when at least one category has a pending item.
    pub fn has_updates(&self) -> bool {
        !self.metadata_profiles.is_empty()
            || !self.metric_profiles.is_empty()
            || !self.layers.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Scan
// ---------------------------------------------------------------------------

/// A namespace known to the scanner. `optimized` means the remote service
/// already manages it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    pub name: String,
    #[serde(default, rename = "kruizeOptimized")]
    pub optimized: bool,
}

/// A container inside a scanned workload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub name: String,
    #[serde(default)]
    pub image: String,
}

/// A scanned workload. `kind` is the workload type string from the service
/// (`Deployment`, `StatefulSet`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workload {
    pub namespace: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub containers: Vec<Container>,
    #[serde(default, rename = "kruizeOptimized")]
    pub optimized: bool,
    #[serde(default)]
    pub labels: Option<LabelSet>,
}

/// Raw scan payload as the service sends it. The workload collection arrives
/// under either `workloads` (current) or `deployments` (pre-migration); see
/// [`normalize::resolve_workloads`] for the resolution policy.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanResult {
    #[serde(default)]
    pub namespaces: Vec<Namespace>,
    #[serde(default)]
    pub workloads: Option<Vec<Workload>>,
    #[serde(default)]
    pub deployments: Option<Vec<Workload>>,
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Workload labels, preserving the wire object's key order.
///
/// A plain `BTreeMap` would re-sort keys; label filtering matches against the
/// pairs in their original order, so the order must survive deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet(pub Vec<(String, String)>);

impl LabelSet {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serialized form used for substring matching: `key=value` pairs joined
    /// by a single space, in insertion order.
    pub fn joined(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LabelSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl Serialize for LabelSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LabelSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LabelSetVisitor;

        impl<'de> Visitor<'de> for LabelSetVisitor {
            type Value = LabelSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of label keys to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, String>()? {
                    pairs.push(entry);
                }
                Ok(LabelSet(pairs))
            }
        }

        deserializer.deserialize_map(LabelSetVisitor)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
