//! Unified error types for the API server.

use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::api::failure::Failure;

/// Errors raised while bootstrapping or running the server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Prometheus recorder could not be installed.
    #[error("metrics error: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Failure returned from a request handler.
///
/// Anything convertible into [`anyhow::Error`] can be returned with `?`.
/// The response is rendered into the error envelope by
/// [`render_failures`](crate::api::failure::render_failures), which decides
/// how much detail the client sees.
#[derive(Debug)]
pub struct HandlerError(anyhow::Error);

impl HandlerError {
    /// The wrapped error.
    pub fn inner(&self) -> &anyhow::Error {
        &self.0
    }
}

impl<E> From<E> for HandlerError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        Failure::from_error(&self.0).into_response()
    }
}
