/// HTTP surface for the optimizer service.
///
/// Five operations against a base URL resolved by [`crate::config`]:
///
/// | operation | method | path                |
/// |-----------|--------|---------------------|
/// | health    | GET    | `/health/kruize`    |
/// | diff      | GET    | `/profiles/diff`    |
/// | scan      | GET    | `/scan[?all=true]`  |
/// | install   | POST   | `/profiles/install` |
/// | update    | POST   | `/profiles/update`  |
///
/// The [`OptimizerApi`] trait is the seam between the session orchestrator
/// and the transport; tests drive the session through fake implementations.
/// The real implementation is the synchronous `ureq` client
/// [`HttpOptimizerClient`]. Timeouts are delegated to `ureq`; any transport
/// rejection (network, DNS, non-2xx) surfaces uniformly as
/// [`ApiError::Transport`].
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::config::ServiceConfig;
use crate::model::{DiffSnapshot, HealthSnapshot, ProfileRef, ScanResult};

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Failure of one network operation.
///
/// Precondition failures (e.g. update with no diff loaded) are not errors —
/// the session treats those as no-ops before any request is built.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network, DNS, or non-2xx response.
    #[error("{operation} request failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: Box<ureq::Error>,
    },
    /// 2xx response whose body did not decode into the expected shape.
    #[error("failed to decode {operation} response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    fn transport(operation: &'static str, source: ureq::Error) -> Self {
        Self::Transport {
            operation,
            source: Box::new(source),
        }
    }

    fn decode(operation: &'static str, source: std::io::Error) -> Self {
        Self::Decode { operation, source }
    }
}

// ---------------------------------------------------------------------------
// Update request body
// ---------------------------------------------------------------------------

/// Body for `POST /profiles/update`: category name → item names.
///
/// Categories that are empty in the diff are omitted from the body entirely,
/// not sent as empty lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata_profiles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metric_profiles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    layers: Option<Vec<String>>,
}

impl UpdateRequest {
    /// Build the request body from a loaded diff snapshot.
    pub fn from_diff(diff: &DiffSnapshot) -> Self {
        Self {
            metadata_profiles: names(&diff.metadata_profiles),
            metric_profiles: names(&diff.metric_profiles),
            layers: names(&diff.layers),
        }
    }
}

/// Item names for one category, or `None` when the category is empty.
fn names(items: &[ProfileRef]) -> Option<Vec<String>> {
    if items.is_empty() {
        None
    } else {
        Some(items.iter().map(|item| item.name.clone()).collect())
    }
}

// ---------------------------------------------------------------------------
// API trait
// ---------------------------------------------------------------------------

/// The five remote operations the session orchestrator depends on.
pub trait OptimizerApi {
    fn fetch_health(&self) -> Result<HealthSnapshot, ApiError>;
    fn fetch_diff(&self) -> Result<DiffSnapshot, ApiError>;
    /// `show_all` adds `?all=true` so the scan includes unoptimized
    /// resources.
    fn fetch_scan(&self, show_all: bool) -> Result<ScanResult, ApiError>;
    /// Install missing profiles/layers. No request body; the response body is
    /// opaque and ignored beyond success/failure.
    fn install_profiles(&self) -> Result<(), ApiError>;
    /// Apply the given update set. The response body is opaque.
    fn update_profiles(&self, request: &UpdateRequest) -> Result<(), ApiError>;
}

// ---------------------------------------------------------------------------
// ureq implementation
// ---------------------------------------------------------------------------

/// Synchronous `ureq` client for the optimizer service.
///
/// Created from the resolved [`ServiceConfig`] and reused for the lifetime of
/// one session.
#[derive(Debug, Clone)]
pub struct HttpOptimizerClient {
    base_url: String,
    timeout: Duration,
}

impl HttpOptimizerClient {
    /// Build a client from the resolved config.
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
    ) -> Result<T, ApiError> {
        let resp = ureq::get(&self.url(path))
            .timeout(self.timeout)
            .call()
            .map_err(|err| ApiError::transport(operation, err))?;
        resp.into_json()
            .map_err(|err| ApiError::decode(operation, err))
    }
}

impl OptimizerApi for HttpOptimizerClient {
    fn fetch_health(&self) -> Result<HealthSnapshot, ApiError> {
        self.get_json("health", "/health/kruize")
    }

    fn fetch_diff(&self) -> Result<DiffSnapshot, ApiError> {
        self.get_json("diff", "/profiles/diff")
    }

    fn fetch_scan(&self, show_all: bool) -> Result<ScanResult, ApiError> {
        let path = if show_all { "/scan?all=true" } else { "/scan" };
        self.get_json("scan", path)
    }

    fn install_profiles(&self) -> Result<(), ApiError> {
        ureq::post(&self.url("/profiles/install"))
            .timeout(self.timeout)
            .call()
            .map_err(|err| ApiError::transport("install", err))?;
        Ok(())
    }

    fn update_profiles(&self, request: &UpdateRequest) -> Result<(), ApiError> {
        ureq::post(&self.url("/profiles/update"))
            .timeout(self.timeout)
            .send_json(request)
            .map_err(|err| ApiError::transport("update", err))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_body_carries_only_populated_categories() {
        let diff = DiffSnapshot {
            metric_profiles: vec![ProfileRef::versioned("p1", "1.0")],
            ..Default::default()
        };
        let body = serde_json::to_string(&UpdateRequest::from_diff(&diff)).unwrap();
        assert_eq!(body, r#"{"metric_profiles":["p1"]}"#);
    }

    #[test]
    fn update_body_for_empty_diff_is_empty_object() {
        let body = serde_json::to_string(&UpdateRequest::from_diff(&DiffSnapshot::default())).unwrap();
        assert_eq!(body, "{}");
    }

    #[test]
    fn update_body_lists_names_in_diff_order() {
        let diff = DiffSnapshot {
            metadata_profiles: vec![ProfileRef::new("meta-b"), ProfileRef::new("meta-a")],
            layers: vec![ProfileRef::new("container")],
            ..Default::default()
        };
        let body = serde_json::to_value(UpdateRequest::from_diff(&diff)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "metadata_profiles": ["meta-b", "meta-a"],
                "layers": ["container"],
            })
        );
    }

    #[test]
    fn client_strips_trailing_slash_from_base_url() {
        let config = ServiceConfig {
            base_url: "http://localhost:8080/".to_string(),
            timeout_ms: 10_000,
        };
        let client = HttpOptimizerClient::from_config(&config);
        assert_eq!(client.url("/scan"), "http://localhost:8080/scan");
    }
}
