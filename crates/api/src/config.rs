use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context};
use axum::http::HeaderValue;
use var_db::{StorageBackend, StoreConfig};
use var_pipeline::config::{ClassifierKind, ExplainerKind};
use var_pipeline::PipelineConfig;

/// Server configuration loaded from environment variables.
///
/// Every field has a default suitable for running offline: no model server,
/// records written under `./results`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins from comma-separated `CORS_ORIGINS`; `*` allows any.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Base URL of the model server. Unset means no models are loaded.
    pub model_server_url: Option<String>,
    /// `false` forces serialized access to every loaded model.
    pub model_reentrant: bool,
    /// How long startup waits for the model server to describe itself.
    pub model_info_timeout: Duration,
    pub pipeline: PipelineConfig,
    pub store: StoreConfig,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                 | Default      |
    /// |-------------------------|--------------|
    /// | `HOST`                  | `0.0.0.0`    |
    /// | `PORT`                  | `8000`       |
    /// | `CORS_ORIGINS`          | `*`          |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`         |
    /// | `CLASSIFIER`            | `model`      |
    /// | `EXPLAINER`             | `generative` |
    /// | `MODEL_SERVER_URL`      | unset        |
    /// | `MODEL_REENTRANT`       | `true`       |
    /// | `MODEL_INFO_TIMEOUT_MS`| `5000`       |
    /// | `INFERENCE_TIMEOUT_MS`  | `2000`       |
    /// | `GENERATION_TIMEOUT_MS` | `5000`       |
    /// | `GENERATION_MAX_TOKENS` | `200`        |
    /// | `MIN_KEYPOINT_SCORE`    | `0.3`        |
    /// | `MOCK_SEED`             | unset        |
    /// | `STORAGE_BACKEND`       | `local`      |
    /// | `RESULTS_DIR`           | `./results`  |
    /// | `DATABASE_URL`          | unset        |
    /// | `PERSIST_FRAMES`        | `true`       |
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = parse_or(&var, "PORT", 8000)?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        for origin in cors_origins.iter().filter(|o| o.as_str() != "*") {
            HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid CORS origin '{origin}'"))?;
        }

        let request_timeout_secs: u64 = parse_or(&var, "REQUEST_TIMEOUT_SECS", 30)?;

        let defaults = PipelineConfig::default();
        let pipeline = PipelineConfig {
            classifier: parse_or(&var, "CLASSIFIER", ClassifierKind::Model)?,
            explainer: parse_or(&var, "EXPLAINER", ExplainerKind::Generative)?,
            min_keypoint_score: parse_or(&var, "MIN_KEYPOINT_SCORE", defaults.min_keypoint_score)?,
            inference_timeout: millis_or(&var, "INFERENCE_TIMEOUT_MS", defaults.inference_timeout)?,
            generation_timeout: millis_or(
                &var,
                "GENERATION_TIMEOUT_MS",
                defaults.generation_timeout,
            )?,
            generation_max_tokens: parse_or(
                &var,
                "GENERATION_MAX_TOKENS",
                defaults.generation_max_tokens,
            )?,
            mock_seed: var("MOCK_SEED")
                .map(|s| s.trim().parse::<u64>())
                .transpose()
                .context("MOCK_SEED must be a valid u64")?,
        };
        if !(0.0..=1.0).contains(&pipeline.min_keypoint_score) {
            bail!("MIN_KEYPOINT_SCORE must be within [0, 1]");
        }

        let store = StoreConfig {
            backend: parse_or(&var, "STORAGE_BACKEND", StorageBackend::Local)?,
            results_dir: var("RESULTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./results")),
            database_url: var("DATABASE_URL"),
            persist_frames: parse_or(&var, "PERSIST_FRAMES", true)?,
        };
        if store.backend == StorageBackend::Postgres && store.database_url.is_none() {
            bail!("DATABASE_URL must be set when STORAGE_BACKEND=postgres");
        }

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            model_server_url: var("MODEL_SERVER_URL"),
            model_reentrant: parse_or(&var, "MODEL_REENTRANT", true)?,
            model_info_timeout: millis_or(
                &var,
                "MODEL_INFO_TIMEOUT_MS",
                Duration::from_millis(5000),
            )?,
            pipeline,
            store,
        })
    }
}

fn parse_or<T>(var: impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{key} is invalid ('{raw}'): {e}")),
        None => Ok(default),
    }
}

fn millis_or(
    var: impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> anyhow::Result<Duration> {
    let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
    parse_or(var, key, default_ms).map(Duration::from_millis)
}
