//! Model-server-backed implementations of the provider traits.

use var_core::features::FeatureMatrix;

use crate::api::ModelServerApi;
use crate::provider::{ModelError, RawScore, ScoringModel, TextGenerator};

/// A scoring model hosted by a model server.
pub struct RemoteScorer {
    api: ModelServerApi,
    name: String,
    feature_width: usize,
    reentrant: bool,
}

impl RemoteScorer {
    pub fn new(api: ModelServerApi, name: String, feature_width: usize, reentrant: bool) -> Self {
        Self {
            api,
            name,
            feature_width,
            reentrant,
        }
    }
}

#[async_trait::async_trait]
impl ScoringModel for RemoteScorer {
    fn name(&self) -> &str {
        &self.name
    }

    fn feature_width(&self) -> usize {
        self.feature_width
    }

    fn is_reentrant(&self) -> bool {
        self.reentrant
    }

    async fn score(&self, features: &FeatureMatrix) -> Result<RawScore, ModelError> {
        if features.width() != self.feature_width {
            return Err(ModelError::ShapeMismatch {
                expected: self.feature_width,
                actual: features.width(),
            });
        }
        let raw = self.api.score(features).await?;
        if !raw.confidence.is_finite() {
            return Err(ModelError::Malformed(format!(
                "non-finite confidence for label '{}'",
                raw.label
            )));
        }
        Ok(raw)
    }
}

/// A text generator hosted by a model server.
pub struct RemoteGenerator {
    api: ModelServerApi,
    name: String,
    reentrant: bool,
}

impl RemoteGenerator {
    pub fn new(api: ModelServerApi, name: String, reentrant: bool) -> Self {
        Self {
            api,
            name,
            reentrant,
        }
    }
}

#[async_trait::async_trait]
impl TextGenerator for RemoteGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_reentrant(&self) -> bool {
        self.reentrant
    }

    async fn generate(&self, prompt: &str, max_length: usize) -> Result<String, ModelError> {
        let text = self.api.generate(prompt, max_length).await?;
        Ok(strip_echoed_prompt(prompt, text))
    }
}

/// Causal language models commonly return the prompt followed by the
/// continuation. Keep only the continuation.
fn strip_echoed_prompt(prompt: &str, text: String) -> String {
    match text.strip_prefix(prompt) {
        Some(rest) => rest.to_string(),
        None => text,
    }
}
