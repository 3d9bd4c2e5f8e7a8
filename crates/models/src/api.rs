//! REST client for the model server.
//!
//! Wraps the model server HTTP API (model info, scoring, text generation)
//! using [`reqwest`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use var_core::features::FeatureMatrix;

use crate::provider::{ModelError, RawScore};

/// Upper bound on any single request. Inference callers apply their own,
/// shorter soft timeouts on top of this.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Upper bound on establishing a connection to the model server.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client for a single model server.
#[derive(Clone)]
pub struct ModelServerApi {
    client: reqwest::Client,
    api_url: String,
}

/// Response of `GET /info`: which models the server has loaded.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerInfo {
    pub scorer: Option<ScorerInfo>,
    pub generator: Option<GeneratorInfo>,
    /// Whether the server tolerates concurrent inference calls.
    #[serde(default = "default_reentrant")]
    pub reentrant: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScorerInfo {
    pub name: String,
    pub feature_width: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorInfo {
    pub name: String,
}

fn default_reentrant() -> bool {
    true
}

#[derive(Serialize)]
struct ScoreRequest<'a> {
    rows: usize,
    width: usize,
    features: &'a [f32],
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    max_length: usize,
}

#[derive(Deserialize)]
struct GenerateResponse {
    text: String,
}

impl ModelServerApi {
    /// Create a new API client.
    ///
    /// * `api_url` - Base HTTP URL, e.g. `http://host:8500`. A trailing
    ///   slash is stripped.
    pub fn new(api_url: impl Into<String>) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, api_url })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Sends `GET /info`, giving up after `timeout`.
    pub async fn info(&self, timeout: Duration) -> Result<ServerInfo, ModelError> {
        let response = self
            .client
            .get(format!("{}/info", self.api_url))
            .timeout(timeout)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Sends `POST /score` with the row-major feature matrix.
    pub async fn score(&self, features: &FeatureMatrix) -> Result<RawScore, ModelError> {
        let body = ScoreRequest {
            rows: features.rows(),
            width: features.width(),
            features: features.values(),
        };

        let response = self
            .client
            .post(format!("{}/score", self.api_url))
            .json(&body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Sends `POST /generate` and returns the generated text.
    pub async fn generate(&self, prompt: &str, max_length: usize) -> Result<String, ModelError> {
        let body = GenerateRequest { prompt, max_length };

        let response = self
            .client
            .post(format!("{}/generate", self.api_url))
            .json(&body)
            .send()
            .await?;

        let parsed: GenerateResponse = Self::parse_response(response).await?;
        Ok(parsed.text)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ModelError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ModelError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ModelError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        let api = ModelServerApi::new("http://models:8500/").unwrap();
        assert_eq!(api.api_url(), "http://models:8500");
    }

    #[test]
    fn info_defaults_to_reentrant() {
        let info: ServerInfo = serde_json::from_value(serde_json::json!({
            "scorer": { "name": "pose-resnet", "feature_width": 51 },
            "generator": null
        }))
        .unwrap();
        assert!(info.reentrant);
        assert_eq!(info.scorer.unwrap().feature_width, 51);
        assert!(info.generator.is_none());
    }
}
