//! HTTP API: handlers, route table, middleware and failure rendering.

pub mod failure;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::AppState;
pub use routes::{create_router, mount};
