#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use var_api::config::ServerConfig;
use var_api::router::build_app_router;
use var_api::state::AppState;
use var_core::features::FeatureExtractor;
use var_core::incident::IncidentType;
use var_db::local::LocalMedium;
use var_db::{DecisionRecordStore, StoreConfig};
use var_models::LoadedModels;
use var_pipeline::classifier::{IncidentClassifier, MockClassifier};
use var_pipeline::explainer::ExplanationGenerator;
use var_pipeline::{PipelineConfig, ReviewService};

/// Build a test `ServerConfig` with safe defaults and records under `dir`.
pub fn test_config(dir: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        model_server_url: None,
        model_reentrant: true,
        model_info_timeout: std::time::Duration::from_millis(500),
        pipeline: PipelineConfig::default(),
        store: StoreConfig {
            results_dir: dir.to_path_buf(),
            ..StoreConfig::default()
        },
    }
}

fn app_with(service: ReviewService, config: ServerConfig) -> Router {
    let state = AppState {
        service: Arc::new(service),
    };
    build_app_router(state, &config)
}

/// Full application router whose classifier always answers
/// `(incident_type, confidence)` and whose explanations are templated.
pub fn build_test_app(dir: &std::path::Path, incident_type: IncidentType, confidence: f64) -> Router {
    let config = test_config(dir);
    let store = DecisionRecordStore::new(Arc::new(LocalMedium::new(dir)), true);
    let service = ReviewService::new(
        FeatureExtractor::default(),
        IncidentClassifier::Mock(MockClassifier::fixed(incident_type, confidence)),
        ExplanationGenerator::Templated,
        Arc::new(store),
    );
    app_with(service, config)
}

/// Router assembled the way the binary does it, with no models loaded.
pub fn build_degraded_app(dir: &std::path::Path) -> Router {
    let config = test_config(dir);
    let store = DecisionRecordStore::new(Arc::new(LocalMedium::new(dir)), true);
    let service = ReviewService::from_config(&config.pipeline, LoadedModels::none(), Arc::new(store));
    app_with(service, config)
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(app: Router, uri: &str, body: String) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}
