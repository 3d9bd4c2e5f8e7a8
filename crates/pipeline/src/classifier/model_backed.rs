//! Classifier wrapping a loaded scoring model.
//!
//! Every model-side failure is translated: a missing model becomes
//! [`CoreError::ModelUnavailable`]; shape mismatches, transport errors,
//! unrecognised labels and timeouts become [`CoreError::Inference`].

use std::sync::Arc;
use std::time::Duration;

use var_core::error::CoreError;
use var_core::features::FeatureMatrix;
use var_core::incident::{Classification, IncidentType};
use var_models::ScoringModel;

use crate::gate::ModelGate;

pub struct ModelBackedClassifier {
    model: Option<Arc<dyn ScoringModel>>,
    gate: Arc<ModelGate>,
    timeout: Duration,
}

impl ModelBackedClassifier {
    /// `gate` is shared with every other consumer of the same model server.
    pub fn new(
        model: Option<Arc<dyn ScoringModel>>,
        gate: Arc<ModelGate>,
        timeout: Duration,
    ) -> Self {
        Self {
            model,
            gate,
            timeout,
        }
    }

    pub async fn classify(&self, features: &FeatureMatrix) -> Result<Classification, CoreError> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| CoreError::ModelUnavailable("scoring model failed to load".into()))?;

        if features.width() != model.feature_width() {
            return Err(CoreError::Inference(format!(
                "model '{}' expects rows of width {}, got {}",
                model.name(),
                model.feature_width(),
                features.width()
            )));
        }

        let raw = tokio::time::timeout(self.timeout, self.gate.run(model.score(features)))
            .await
            .map_err(|_| {
                CoreError::Inference(format!(
                    "scoring timed out after {}ms",
                    self.timeout.as_millis()
                ))
            })?
            .map_err(|e| CoreError::Inference(e.to_string()))?;

        let incident_type = IncidentType::from_label(&raw.label).ok_or_else(|| {
            CoreError::Inference(format!("model produced unrecognised label '{}'", raw.label))
        })?;

        Ok(Classification::new(incident_type, raw.confidence))
    }
}
