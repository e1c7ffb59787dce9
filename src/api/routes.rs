use axum::{
    routing::{get, put},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/students/:student_id/recommendations",
            get(handlers::daily_recommendations),
        )
        .route(
            "/recommendation-sets/:set_id",
            put(handlers::replace_recommendation_set),
        )
}
