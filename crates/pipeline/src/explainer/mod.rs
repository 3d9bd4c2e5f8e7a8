//! Explanation generation.
//!
//! [`ExplanationGenerator::explain`] cannot fail: a generative failure of
//! any kind is logged and answered with the templated sentence instead.

pub mod generative;
pub mod templates;

use std::sync::Arc;

use chrono::Utc;
use var_core::incident::{Classification, Explanation, ExplanationSource};
use var_models::TextGenerator;

use crate::config::{ExplainerKind, PipelineConfig};
use crate::gate::ModelGate;

pub use generative::GenerativeExplainer;

pub enum ExplanationGenerator {
    Generative(GenerativeExplainer),
    Templated,
}

impl ExplanationGenerator {
    /// Build the configured variant.
    ///
    /// A configured generator that is not available degrades to templated.
    /// The second element reports whether that degradation happened.
    pub fn from_config(
        config: &PipelineConfig,
        generator: Option<Arc<dyn TextGenerator>>,
        gate: Arc<ModelGate>,
    ) -> (Self, bool) {
        match (config.explainer, generator) {
            (ExplainerKind::Generative, Some(g)) => (
                Self::Generative(GenerativeExplainer::new(
                    g,
                    gate,
                    config.generation_timeout,
                    config.generation_max_tokens,
                )),
                false,
            ),
            (ExplainerKind::Generative, None) => {
                tracing::warn!("Text generator unavailable, explanations degraded to templated");
                (Self::Templated, true)
            }
            (ExplainerKind::Templated, _) => (Self::Templated, false),
        }
    }

    pub fn variant(&self) -> &'static str {
        match self {
            Self::Generative(_) => "generative",
            Self::Templated => "templated",
        }
    }

    pub async fn explain(&self, classification: &Classification) -> Explanation {
        if let Self::Generative(g) = self {
            match g.generate(classification).await {
                Ok(body) => {
                    return Explanation {
                        text: templates::with_confidence(&body, classification),
                        generated_at: Utc::now(),
                        source: ExplanationSource::Generative,
                    };
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        model = %g.model_name(),
                        incident_type = %classification.incident_type,
                        "Generation failed, using templated explanation"
                    );
                }
            }
        }

        Explanation {
            text: templates::render(classification),
            generated_at: Utc::now(),
            source: ExplanationSource::Templated,
        }
    }
}
