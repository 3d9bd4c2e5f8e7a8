//! Route definitions for the review pipeline.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::review;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/models/analyze", post(review::analyze_frame))
        .route("/llm/explain", post(review::explain_incident))
        .route("/db/save", post(review::save_results))
        .route("/db/results/{id}", get(review::load_result))
        .route("/incidents/review", post(review::review_incident))
}
