use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;
use crate::middleware::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Reads
        .route("/users/:user_id/profile", get(handlers::get_profile))
        .route("/users/:user_id/recommendations", get(handlers::get_recommendations))
        .route("/users/:user_id/feed", get(handlers::get_feed))
        .route("/users/:user_id/analysis", get(handlers::get_analysis))
        // Mutations
        .route("/users/:user_id/ratings", post(handlers::rate))
        .route("/users/:user_id/interactions", post(handlers::record_interaction))
        .route("/users/:user_id/preferences", post(handlers::add_preference))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}
