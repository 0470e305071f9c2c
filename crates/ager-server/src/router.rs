//! HTTP router construction.

use std::sync::Arc;

use axum::Router;
use axum::handler::Handler;
use axum::http::{HeaderValue, Method, header};
use axum::middleware;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::state::AppState;
use crate::{api, live, rate_limit};

/// CORS for the configured frontend origin; falls back to permissive when
/// the origin is not a valid header value.
fn cors_layer(frontend_url: &str) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);
    match HeaderValue::from_str(frontend_url) {
        Ok(origin) => base.allow_origin(origin),
        Err(_) => {
            warn!(frontend_url, "FRONTEND_URL is not a valid origin, allowing any");
            CorsLayer::permissive()
        }
    }
}

pub fn build_router(state: Arc<AppState>, frontend_url: &str) -> Router {
    let submit = api::submit_task.layer(middleware::from_fn_with_state(
        Arc::clone(&state),
        rate_limit::limit_submissions,
    ));

    Router::new()
        .route("/health", get(api::health))
        .route("/api/tasks", get(api::list_tasks).post(submit))
        // /completed and /current must not be read as task ids
        .route(
            "/api/tasks/completed",
            get(api::list_completed).delete(api::clear_completed),
        )
        .route("/api/tasks/current", get(api::current_task))
        .route("/ws", get(live::ws_upgrade))
        .layer(cors_layer(frontend_url))
        .with_state(state)
}
