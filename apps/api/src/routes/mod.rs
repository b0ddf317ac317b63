pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::evaluation::handlers as evaluation;
use crate::marketplace::handlers as marketplace;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Marketplace API
        .route(
            "/api/v1/designers",
            post(marketplace::handle_register_designer),
        )
        .route(
            "/api/v1/designers/:id",
            get(marketplace::handle_get_designer),
        )
        .route(
            "/api/v1/jobs",
            post(marketplace::handle_create_job).get(marketplace::handle_list_jobs),
        )
        .route("/api/v1/jobs/:id", get(marketplace::handle_get_job))
        .route("/api/v1/jobs/:id/bids", post(marketplace::handle_place_bid))
        // Evaluation API
        .route(
            "/api/v1/jobs/:id/bids/ranked",
            get(evaluation::handle_ranked_bids),
        )
        .route(
            "/api/v1/jobs/:id/bids/summarize-all",
            post(evaluation::handle_summarize_all),
        )
        .route(
            "/api/v1/jobs/:id/bids/:bid_id/summarize",
            post(evaluation::handle_summarize_bid),
        )
        .with_state(state)
}
