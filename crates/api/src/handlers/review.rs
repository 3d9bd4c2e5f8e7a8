//! Handlers for the review pipeline.
//!
//! Request bodies are decoded through [`JsonRejection`]-aware extractors so
//! malformed JSON answers with the same `{error, code}` shape as domain
//! validation failures.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use var_core::incident::Classification;
use var_core::keypoint::Frame;
use var_core::record::RecordCandidate;
use var_core::types::{FrameTime, Timestamp};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

/// Body of `POST /llm/explain`.
#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    #[serde(flatten)]
    pub classification: Classification,
    /// Also accepted as `frame_data`.
    #[serde(default, alias = "frame_data")]
    pub frames: Option<Vec<Frame>>,
}

/// Classification of one frame, tagged with that frame's timestamp.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub classification: Classification,
    pub timestamp: FrameTime,
}

/// Body of `POST /incidents/review`.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub frames: Vec<Frame>,
    #[serde(default)]
    pub persist: bool,
}

/// Acknowledgement of a successful save.
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub success: bool,
    pub id: String,
    pub filename: String,
    pub saved_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /models/analyze
///
/// Classify a single keypoint frame. The frame's timestamp is echoed back.
pub async fn analyze_frame(
    State(state): State<AppState>,
    payload: Result<Json<Frame>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(frame) = payload?;
    let classification = state.service.analyze_frame(&frame).await?;

    Ok(Json(DataResponse {
        data: AnalyzeResponse {
            classification,
            timestamp: frame.timestamp,
        },
    }))
}

/// POST /llm/explain
pub async fn explain_incident(
    State(state): State<AppState>,
    payload: Result<Json<ExplainRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let explanation = state
        .service
        .explain_incident(input.classification, input.frames.as_deref())
        .await?;

    Ok(Json(DataResponse { data: explanation }))
}

/// POST /db/save
///
/// Persist a decision record. Responds `201 Created` with the assigned id.
pub async fn save_results(
    State(state): State<AppState>,
    payload: Result<Json<RecordCandidate>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(candidate) = payload?;
    let record = state.service.save_results(candidate).await?;

    let body = SaveResponse {
        success: true,
        filename: var_db::store::artifact_name(&record.id),
        id: record.id,
        saved_at: record.saved_at,
    };
    Ok((StatusCode::CREATED, Json(DataResponse { data: body })))
}

/// GET /db/results/{id}
pub async fn load_result(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let record = state.service.load_result(&id).await?;

    Ok(Json(DataResponse { data: record }))
}

/// POST /incidents/review
///
/// Classify, explain and (when `persist` is set) save in one call.
pub async fn review_incident(
    State(state): State<AppState>,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let outcome = state
        .service
        .review_incident(input.frames, input.persist)
        .await?;

    Ok(Json(DataResponse { data: outcome }))
}
