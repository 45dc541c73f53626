use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use super::handlers::{
    dash, example, health_check, not_found, pages, referers, scripts, tracker, uniques, AppState,
};
use super::middleware::log_request;

/// Build the full dispatch table. Constructed once at startup.
pub fn create_router(state: Arc<AppState>) -> Router {
    let client_routes = Router::new()
        .route("/{client_id}/tracker.gif", get(tracker))
        .route("/{client_id}/uniques", get(uniques))
        .route("/{client_id}/referers", get(referers))
        .route("/{client_id}/pages", get(pages))
        .route("/{client_id}/dash", get(dash))
        .layer(CorsLayer::permissive())
        .with_state(Arc::clone(&state));

    Router::new()
        .route("/health", get(health_check))
        .route("/example/", get(example))
        .route("/scripts/{*path}", get(scripts))
        .with_state(state)
        .nest("/client", client_routes)
        .fallback(not_found)
        .layer(middleware::from_fn(log_request))
}
