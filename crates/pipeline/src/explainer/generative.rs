//! Language-model-backed explanations.
//!
//! The prompt is a pure function of the classification. Output is bounded
//! to `max_tokens` whitespace-separated tokens, and each call is capped by a
//! soft timeout that also covers waiting for a serialized model.

use std::sync::Arc;
use std::time::Duration;

use var_core::error::CoreError;
use var_core::incident::Classification;
use var_models::TextGenerator;

use crate::gate::ModelGate;

pub struct GenerativeExplainer {
    generator: Arc<dyn TextGenerator>,
    gate: Arc<ModelGate>,
    timeout: Duration,
    max_tokens: usize,
}

impl GenerativeExplainer {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        gate: Arc<ModelGate>,
        timeout: Duration,
        max_tokens: usize,
    ) -> Self {
        Self {
            generator,
            gate,
            timeout,
            max_tokens: max_tokens.max(1),
        }
    }

    pub fn model_name(&self) -> &str {
        self.generator.name()
    }

    /// Generate an explanation body (without the confidence suffix).
    ///
    /// Fails with [`CoreError::Generation`] on backend error, timeout, or
    /// empty output.
    pub async fn generate(&self, classification: &Classification) -> Result<String, CoreError> {
        let prompt = build_prompt(classification);

        let text = tokio::time::timeout(
            self.timeout,
            self.gate
                .run(self.generator.generate(&prompt, self.max_tokens)),
        )
        .await
        .map_err(|_| {
            CoreError::Generation(format!(
                "generation timed out after {}ms",
                self.timeout.as_millis()
            ))
        })?
        .map_err(|e| CoreError::Generation(e.to_string()))?;

        let bounded = bound_tokens(&text, self.max_tokens);
        if bounded.is_empty() {
            return Err(CoreError::Generation("model returned empty text".into()));
        }
        Ok(bounded)
    }
}

/// Prompt sent to the text generator.
pub fn build_prompt(classification: &Classification) -> String {
    format!(
        "Analyze the following football incident:\n\
         Type: {}\n\
         Confidence: {}\n\n\
         Provide a detailed explanation of why this decision was made:\n",
        classification.incident_type,
        classification.formatted_confidence()
    )
}

/// Keep at most `max_tokens` whitespace-separated tokens, single-spaced.
pub fn bound_tokens(text: &str, max_tokens: usize) -> String {
    text.split_whitespace()
        .take(max_tokens)
        .collect::<Vec<_>>()
        .join(" ")
}
