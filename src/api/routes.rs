//! HTTP API route definitions.

use std::any::Any;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, normalize_path::NormalizePathLayer,
    trace::TraceLayer,
};

use super::failure::{install_panic_hook, panic_response, render_failures};
use super::handlers::{
    api_root, health, metrics_export, not_found, root, v1_health, v1_info, v1_root, AppState,
};
use super::middleware::{security_headers, track_requests};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    mount(Router::new(), state)
}

/// Mount `extra` routes next to the built-in ones and wrap everything in the
/// fallback and middleware stack. A trailing slash is trimmed before routing,
/// so `/health/` is served as `/health`.
pub fn mount(extra: Router<AppState>, state: AppState) -> Router {
    install_panic_hook();
    let production = state.config.is_production();
    let body_limit = state.config.body_limit_bytes;

    let mut router = Router::new()
        // App endpoints
        .route("/", get(root).fallback(not_found))
        .route("/health", get(health).fallback(not_found))
        // Versioned API
        .nest("/api", api_router())
        .merge(extra);

    if state.metrics.is_some() {
        router = router.route("/metrics", get(metrics_export).fallback(not_found));
    }

    let app = router
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(security_headers))
                .layer(middleware::from_fn(track_requests))
                .layer(middleware::from_fn_with_state(state.clone(), render_failures))
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(CatchPanicLayer::custom(move |err: Box<dyn Any + Send + 'static>| {
                    panic_response(err, production)
                })),
        )
        .with_state(state);

    // Layers on a router run after route matching; wrapping the finished
    // app as a fallback service lets the path be rewritten first.
    Router::new()
        .fallback_service(app)
        .layer(NormalizePathLayer::trim_trailing_slash())
}

/// `/api` routes.
fn api_router() -> Router<AppState> {
    Router::new()
        .route("/", get(api_root).fallback(not_found))
        .nest("/v1", v1_router())
}

/// `/api/v1` routes.
fn v1_router() -> Router<AppState> {
    Router::new()
        .route("/", get(v1_root).fallback(not_found))
        .route("/health", get(v1_health).fallback(not_found))
        .route("/info", get(v1_info).fallback(not_found))
}
