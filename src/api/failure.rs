//! Conversion of unhandled failures into the error envelope.
//!
//! Handler errors leave a [`Failure`] in the response extensions; the
//! [`render_failures`] middleware turns it into the final body using the
//! configured environment. Panics are caught by the panic layer and rendered
//! through [`panic_response`]; [`install_panic_hook`] records where the panic
//! happened so the development envelope can show it.

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::RefCell;
use std::panic;
use std::sync::Once;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use super::handlers::AppState;
use crate::envelope::ResponseBody;
use crate::metrics;

/// Message shown to clients in production instead of the failure's own.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong";

/// Kind reported for handler errors.
pub const KIND_ERROR: &str = "Error";

/// Kind reported for caught panics.
pub const KIND_PANIC: &str = "Panic";

thread_local! {
    static PANIC_TRACE: RefCell<Option<String>> = const { RefCell::new(None) };
}

static PANIC_HOOK: Once = Once::new();

/// Chain a panic hook that keeps the location and backtrace of the last
/// panic on the panicking thread. The panic layer catches on that same
/// thread, so [`Failure::from_panic`] can pick the trace up.
pub fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let trace = format!("{info}\n{}", Backtrace::force_capture());
            PANIC_TRACE.with(|slot| *slot.borrow_mut() = Some(trace));
            previous(info);
        }));
    });
}

fn take_panic_trace(message: &str) -> Option<String> {
    PANIC_TRACE
        .with(|slot| slot.borrow_mut().take())
        .filter(|trace| trace.contains(message))
}

/// Payload of a 500 envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailureDetail {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// An unhandled failure captured while serving a request.
#[derive(Debug, Clone)]
pub struct Failure {
    pub kind: &'static str,
    pub message: String,
    pub trace: String,
}

impl Failure {
    /// Capture a handler error. The trace is the error chain plus the
    /// backtrace when one was recorded.
    pub fn from_error(err: &anyhow::Error) -> Self {
        Self {
            kind: KIND_ERROR,
            message: err.to_string(),
            trace: format!("{err:?}"),
        }
    }

    /// Capture a panic payload. The trace comes from [`install_panic_hook`]
    /// when it ran, otherwise it only names the panic.
    pub fn from_panic(payload: Box<dyn Any + Send + 'static>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "handler panicked".to_string()
        };
        let trace =
            take_panic_trace(&message).unwrap_or_else(|| format!("panicked at handler: {message}"));
        Self {
            kind: KIND_PANIC,
            trace,
            message,
        }
    }

    /// Build the error envelope. Production hides the message and trace.
    pub fn into_envelope(self, production: bool) -> ResponseBody<FailureDetail> {
        let (message, stack) = if production {
            (GENERIC_FAILURE_MESSAGE.to_string(), None)
        } else {
            (self.message, Some(self.trace))
        };
        ResponseBody::error(
            StatusCode::INTERNAL_SERVER_ERROR,
            message,
            Some(FailureDetail {
                error: self.kind.to_string(),
                stack,
            }),
        )
    }
}

impl IntoResponse for Failure {
    /// Renders the production form and keeps the failure in the extensions
    /// so [`render_failures`] can re-render it for the active environment.
    fn into_response(self) -> Response {
        let mut response = self.clone().into_envelope(true).into_response();
        response.extensions_mut().insert(self);
        response
    }
}

/// Middleware rendering [`Failure`]s left by handlers.
pub async fn render_failures(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    match response.extensions_mut().remove::<Failure>() {
        Some(failure) => {
            error!(kind = failure.kind, message = %failure.message, "Request failed");
            metrics::inc_failures(failure.kind);
            failure.into_envelope(state.config.is_production()).into_response()
        }
        None => response,
    }
}

/// Response for a panic caught by the panic layer.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>, production: bool) -> Response {
    let failure = Failure::from_panic(payload);
    error!(kind = failure.kind, message = %failure.message, "Handler panicked");
    metrics::inc_failures(failure.kind);
    failure.into_envelope(production).into_response()
}
