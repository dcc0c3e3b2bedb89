use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Catalog
        .route("/catalog", get(handlers::get_catalog))
        .route("/genres", get(handlers::get_genres))
        // Profiles
        .route("/profiles", post(handlers::create_profile))
        .route("/profiles/:username", get(handlers::get_profile))
        .route("/profiles/:username/ratings", put(handlers::upsert_rating))
        .route(
            "/profiles/:username/ratings/:title",
            delete(handlers::delete_rating),
        )
        // Recommendations
        .route(
            "/profiles/:username/recommendations",
            get(handlers::profile_recommendations),
        )
        .route("/recommendations", post(handlers::recommend))
        // Request id is assigned before the trace span opens so the span can carry it
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}
