//! Response envelope returned by every endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::timestamp::Timestamp;

/// Open key/value bag for extra response details.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Envelope variant.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
    Warning,
    Healthy,
    Unhealthy,
}

impl Status {
    /// Whether `code` is a sensible HTTP status for this variant.
    ///
    /// `ok`, `warning` and `healthy` pair with 2xx; `error` and `unhealthy`
    /// with 4xx/5xx.
    pub fn admits(self, code: StatusCode) -> bool {
        match self {
            Status::Ok | Status::Warning | Status::Healthy => code.is_success(),
            Status::Error | Status::Unhealthy => {
                code.is_client_error() || code.is_server_error()
            }
        }
    }
}

/// The JSON envelope.
///
/// `payload` and `metadata` are omitted from the wire form when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody<T, M = Metadata> {
    pub status: Status,
    pub status_code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
    pub timestamp: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<M>,
}

impl<T> ResponseBody<T> {
    fn build(
        status: Status,
        status_code: StatusCode,
        message: impl Into<String>,
        payload: Option<T>,
    ) -> Self {
        debug_assert!(
            status.admits(status_code),
            "{status} envelope built with status code {status_code}"
        );
        Self {
            status,
            status_code: status_code.as_u16(),
            message: message.into(),
            payload,
            timestamp: Timestamp::now(),
            metadata: None,
        }
    }

    /// `ok` envelope.
    pub fn success(status_code: StatusCode, message: impl Into<String>, payload: Option<T>) -> Self {
        Self::build(Status::Ok, status_code, message, payload)
    }

    /// `error` envelope, for 4xx and 5xx responses.
    pub fn error(status_code: StatusCode, message: impl Into<String>, payload: Option<T>) -> Self {
        Self::build(Status::Error, status_code, message, payload)
    }

    /// `warning` envelope: the operation succeeded but something deserves attention.
    pub fn warning(status_code: StatusCode, message: impl Into<String>, payload: Option<T>) -> Self {
        Self::build(Status::Warning, status_code, message, payload)
    }

    /// `healthy` envelope for passing health checks.
    pub fn healthy(status_code: StatusCode, message: impl Into<String>, payload: Option<T>) -> Self {
        Self::build(Status::Healthy, status_code, message, payload)
    }

    /// `unhealthy` envelope for failing health checks.
    pub fn unhealthy(status_code: StatusCode, message: impl Into<String>, payload: Option<T>) -> Self {
        Self::build(Status::Unhealthy, status_code, message, payload)
    }
}

impl<T, M> ResponseBody<T, M> {
    /// Attach metadata, replacing any already present.
    pub fn with_metadata<N>(self, metadata: N) -> ResponseBody<T, N> {
        ResponseBody {
            status: self.status,
            status_code: self.status_code,
            message: self.message,
            payload: self.payload,
            timestamp: self.timestamp,
            metadata: Some(metadata),
        }
    }

    /// HTTP status mirrored from `statusCode`.
    pub fn http_status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl<T: Serialize, M: Serialize> IntoResponse for ResponseBody<T, M> {
    fn into_response(self) -> Response {
        (self.http_status(), Json(self)).into_response()
    }
}
