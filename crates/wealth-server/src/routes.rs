//! Router assembly

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/models", get(handlers::list_models))
        .route("/api/advice", post(handlers::advice_handler))
        .route("/api/plan", post(handlers::plan_handler))
        .route("/api/plan/export", post(handlers::export_plan))
        .route("/api/guides", get(handlers::list_guides).post(handlers::guide_handler))
        .route("/api/rebalance", post(handlers::rebalance_handler))
        .route("/api/market", get(handlers::market_handler))
        .route("/api/yields", get(handlers::yields_handler))
        .route("/api/opportunities", post(handlers::opportunities_handler))
        .route("/api/projection", post(handlers::projection_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
