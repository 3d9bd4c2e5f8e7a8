pub mod health;
pub mod review;

use axum::Router;

use crate::state::AppState;

/// Build the review route tree.
///
/// ```text
/// POST /models/analyze          classify one frame
/// POST /llm/explain             explain a classification
/// POST /db/save                 persist a decision record
/// GET  /db/results/{id}         load a decision record
/// POST /incidents/review        classify, explain and optionally persist
/// ```
pub fn api_routes() -> Router<AppState> {
    review::router()
}
