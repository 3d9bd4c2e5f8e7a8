use std::sync::Arc;

use var_pipeline::ReviewService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The review pipeline. Models inside are read-only after startup.
    pub service: Arc<ReviewService>,
}
