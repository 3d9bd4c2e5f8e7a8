//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly; no router is involved.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use var_api::error::AppError;
use var_core::error::CoreError;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Test: InvalidInput maps to 400 and keeps its message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_input_returns_400() {
    let err = AppError::Core(CoreError::InvalidInput(
        "frame must contain at least one keypoint".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_INPUT");
    assert_eq!(json["error"], "frame must contain at least one keypoint");
}

// ---------------------------------------------------------------------------
// Test: NotFound maps to 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        id: "20250101T000000-000001-0badf00d".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(
        json["error"],
        "Decision record 20250101T000000-000001-0badf00d not found"
    );
}

// ---------------------------------------------------------------------------
// Test: model faults map to 503 without leaking details
// ---------------------------------------------------------------------------

#[tokio::test]
async fn model_errors_return_503() {
    for (err, code) in [
        (CoreError::ModelUnavailable("no scorer".into()), "MODEL_UNAVAILABLE"),
        (CoreError::Inference("cuda oom at 0x7f".into()), "INFERENCE_ERROR"),
        (CoreError::Generation("timed out".into()), "GENERATION_ERROR"),
    ] {
        let (status, json) = error_to_response(AppError::Core(err)).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["code"], code);
        assert!(!json["error"].as_str().unwrap().contains("0x7f"));
    }
}

// ---------------------------------------------------------------------------
// Test: Persistence maps to 500 with a sanitized message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn persistence_error_returns_500_sanitized() {
    let err = AppError::Core(CoreError::Persistence(
        "I/O error: permission denied (/var/lib/var/results)".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "PERSISTENCE_ERROR");
    assert!(!json["error"].as_str().unwrap().contains("/var/lib"));
}

// ---------------------------------------------------------------------------
// Test: BadRequest and InternalError
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_request_error_returns_400() {
    let (status, json) = error_to_response(AppError::BadRequest("invalid body".into())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "invalid body");
}

#[tokio::test]
async fn internal_error_returns_500_sanitized() {
    let (status, json) =
        error_to_response(AppError::InternalError("secret detail".into())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}
