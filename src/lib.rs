//! Minimal HTTP API scaffold.
//!
//! Every endpoint answers with the same JSON envelope:
//!
//! ```text
//! {
//!   "status": "healthy",
//!   "statusCode": 200,
//!   "message": "API Template",
//!   "payload": { "version": "1.0.0", "endpoints": { ... } },
//!   "timestamp": "2024-01-01T00:00:00.000Z"
//! }
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`timestamp`]: ISO 8601 UTC timestamps and date formatting
//! - [`envelope`]: Request and response bodies
//! - [`info`]: Static application and API metadata
//! - [`api`]: Handlers, routes and middleware
//! - [`metrics`]: Prometheus metrics
//! - [`server`]: Server bootstrap
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod envelope;
pub mod error;
pub mod info;
pub mod metrics;
pub mod server;
pub mod timestamp;
pub mod utils;

pub use config::Config;
pub use envelope::{RequestBody, ResponseBody, Status};
pub use error::{HandlerError, Result, ServerError};
pub use timestamp::Timestamp;
