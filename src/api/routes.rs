use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/suggest", post(handlers::suggest))
        .route("/shopping-suggestions", post(handlers::shopping_suggestions))
        .route("/mealplan-suggestions", post(handlers::mealplan_suggestions))
        // The web client is served from a different origin.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
