//! Outbound model capabilities.
//!
//! [`ScoringModel`] turns a feature matrix into a raw label and confidence;
//! [`TextGenerator`] turns a prompt into free text. Both are optional at
//! startup, and callers are expected to degrade when they are absent.

use var_core::features::FeatureMatrix;

/// Errors from a model provider.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The model server returned a non-2xx status code.
    #[error("Model server error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The features do not match the shape the model was loaded with.
    #[error("Feature width mismatch: model expects {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// The model answered with something that cannot be interpreted.
    #[error("Malformed model output: {0}")]
    Malformed(String),
}

/// Raw, unvalidated output of a scoring model.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct RawScore {
    pub label: String,
    pub confidence: f64,
}

/// A loaded incident-scoring model.
#[async_trait::async_trait]
pub trait ScoringModel: Send + Sync {
    fn name(&self) -> &str;

    /// Row width the model was trained on.
    fn feature_width(&self) -> usize;

    /// Whether concurrent calls are safe. Non-reentrant models are
    /// serialized by the caller.
    fn is_reentrant(&self) -> bool {
        true
    }

    async fn score(&self, features: &FeatureMatrix) -> Result<RawScore, ModelError>;
}

/// A loaded text-generation model.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &str;

    fn is_reentrant(&self) -> bool {
        true
    }

    /// Generate text for `prompt`, bounded to roughly `max_length` tokens.
    async fn generate(&self, prompt: &str, max_length: usize) -> Result<String, ModelError>;
}
