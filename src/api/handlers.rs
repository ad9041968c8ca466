//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::envelope::ResponseBody;
use crate::info::{ApiVersionInfo, PathMap, API_INFO, API_V1_INFO, APP_INFO};

/// Message of the 404 envelope.
pub const NOT_FOUND_MESSAGE: &str = "The requested resource was not found";

/// Application state shared with handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    /// Configuration, fixed at startup.
    pub config: Arc<Config>,
    /// Prometheus handle when the recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state.
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            metrics: None,
        }
    }

    /// Expose metrics through `handle`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Payload of the root and health envelopes.
#[derive(Debug, Serialize)]
pub struct AppSummary {
    pub version: &'static str,
    pub endpoints: PathMap,
}

/// Payload of the API root envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSummary {
    pub version: &'static str,
    pub endpoints: PathMap,
    pub supported_versions: &'static [&'static str],
    pub deprecated_versions: &'static [&'static str],
    pub versioning_strategy: &'static str,
    pub documentation: PathMap,
}

/// Payload carrying only a version string.
#[derive(Debug, Serialize)]
pub struct VersionSummary {
    pub version: &'static str,
}

/// Payload of the 404 envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotFoundDetail {
    pub path: String,
}

fn app_summary() -> AppSummary {
    AppSummary {
        version: APP_INFO.version,
        endpoints: APP_INFO.endpoints,
    }
}

/// `GET /`
pub async fn root() -> ResponseBody<AppSummary> {
    ResponseBody::success(StatusCode::OK, APP_INFO.name, Some(app_summary()))
}

/// `GET /health` - liveness check, always healthy while the process serves.
pub async fn health() -> ResponseBody<AppSummary> {
    ResponseBody::healthy(StatusCode::OK, APP_INFO.name, Some(app_summary()))
}

/// `GET /api`
pub async fn api_root() -> ResponseBody<ApiSummary> {
    ResponseBody::success(
        StatusCode::OK,
        API_INFO.name,
        Some(ApiSummary {
            version: API_INFO.version,
            endpoints: API_INFO.version_endpoints,
            supported_versions: API_INFO.supported_versions,
            deprecated_versions: API_INFO.deprecated_versions,
            versioning_strategy: API_INFO.versioning_strategy,
            documentation: API_INFO.documentation,
        }),
    )
}

/// `GET /api/v1`
pub async fn v1_root() -> ResponseBody<VersionSummary> {
    ResponseBody::success(
        StatusCode::OK,
        API_V1_INFO.name,
        Some(VersionSummary {
            version: API_V1_INFO.version,
        }),
    )
}

/// `GET /api/v1/health`
pub async fn v1_health() -> ResponseBody<VersionSummary> {
    ResponseBody::healthy(
        StatusCode::OK,
        API_V1_INFO.name,
        Some(VersionSummary {
            version: API_V1_INFO.version,
        }),
    )
}

/// `GET /api/v1/info` - the full v1 registry.
pub async fn v1_info() -> ResponseBody<&'static ApiVersionInfo> {
    ResponseBody::success(StatusCode::OK, API_V1_INFO.name, Some(&API_V1_INFO))
}

/// Fallback for unmatched paths and methods. Echoes the original path and
/// query string.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> ResponseBody<NotFoundDetail> {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    ResponseBody::error(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE, Some(NotFoundDetail { path }))
}

/// `GET /metrics` - Prometheus text exposition.
pub async fn metrics_export(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
