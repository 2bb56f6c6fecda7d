use crate::cors::{register_policy, API_PATH_PREFIX};
use crate::middleware::request_id_middleware;
use axum::middleware;
use axum::routing::{any, get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::health;
use super::AppState;

/// Create application router
///
/// Everything under [`API_PATH_PREFIX`] is governed by the state's CORS
/// policy; anything else is served without CORS headers.
pub fn create_router(state: Arc<AppState>) -> axum::Router {
    let api_routes = axum::Router::new()
        .route("/health", get(health::health_check))
        .fallback(health::api_not_found);

    let api_routes = register_policy(api_routes, &state.cors_policy);

    // `nest` covers `/api` and `/api/{*tail}` but not the bare `/api/`
    let api_root_slash = axum::Router::<Arc<AppState>>::new()
        .route(&format!("{}/", API_PATH_PREFIX), any(health::api_not_found));
    let api_root_slash = register_policy(api_root_slash, &state.cors_policy);

    axum::Router::new()
        .nest(API_PATH_PREFIX, api_routes)
        .merge(api_root_slash)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
