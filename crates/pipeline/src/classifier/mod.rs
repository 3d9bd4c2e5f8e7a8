//! Incident classification.
//!
//! [`IncidentClassifier`] is a closed set of variants chosen at
//! construction time. Both variants answer `unknown` with confidence 0 for
//! degenerate (all-zero) features instead of guessing.

pub mod mock;
pub mod model_backed;

use std::sync::Arc;

use var_core::error::CoreError;
use var_core::features::FeatureMatrix;
use var_core::incident::Classification;
use var_models::ScoringModel;

use crate::config::{ClassifierKind, PipelineConfig};
use crate::gate::ModelGate;

pub use mock::MockClassifier;
pub use model_backed::ModelBackedClassifier;

pub enum IncidentClassifier {
    ModelBacked(ModelBackedClassifier),
    Mock(MockClassifier),
}

impl IncidentClassifier {
    /// Build the configured variant.
    ///
    /// A configured model that is not available degrades to the random mock.
    /// The second element reports whether that degradation happened.
    pub fn from_config(
        config: &PipelineConfig,
        scorer: Option<Arc<dyn ScoringModel>>,
        gate: Arc<ModelGate>,
    ) -> (Self, bool) {
        match (config.classifier, scorer) {
            (ClassifierKind::Model, Some(model)) => (
                Self::ModelBacked(ModelBackedClassifier::new(
                    Some(model),
                    gate,
                    config.inference_timeout,
                )),
                false,
            ),
            (ClassifierKind::Model, None) => {
                tracing::warn!("Scoring model unavailable, classifier degraded to mock");
                (Self::Mock(MockClassifier::random(config.mock_seed)), true)
            }
            (ClassifierKind::Mock, _) => (Self::Mock(MockClassifier::random(config.mock_seed)), false),
        }
    }

    /// Variant name for health reporting.
    pub fn variant(&self) -> &'static str {
        match self {
            Self::ModelBacked(_) => "model",
            Self::Mock(_) => "mock",
        }
    }

    pub async fn classify(&self, features: &FeatureMatrix) -> Result<Classification, CoreError> {
        if features.is_degenerate() {
            return Ok(Classification::unknown());
        }
        match self {
            Self::ModelBacked(c) => c.classify(features).await,
            Self::Mock(m) => Ok(m.pick()),
        }
    }
}
