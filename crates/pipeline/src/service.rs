//! The review service: orchestrates extraction, classification, explanation
//! and persistence for each request.
//!
//! Per request the stages run strictly in order:
//!
//! ```text
//! Received -> Extracted -> Classified -> Explained -> (Saved) -> Responded
//! ```
//!
//! A failing stage jumps straight to `Responded` with its error; later
//! stages never run. Classifier failures are recovered here as
//! `unknown`/0, so only invalid input and persistence faults reach callers.
//!
//! Model handles are injected once at construction and only read afterwards.

use std::fmt;
use std::slice;
use std::sync::Arc;

use serde::Serialize;
use var_core::error::CoreError;
use var_core::features::FeatureExtractor;
use var_core::incident::{Classification, Explanation};
use var_core::keypoint::{validate_frames, Frame};
use var_core::record::{DecisionRecord, RecordCandidate};
use var_db::DecisionRecordStore;
use var_models::LoadedModels;

use crate::classifier::IncidentClassifier;
use crate::config::PipelineConfig;
use crate::explainer::ExplanationGenerator;
use crate::gate::ModelGate;

// ---------------------------------------------------------------------------
// Stages and outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStage {
    Received,
    Extracted,
    Classified,
    Explained,
    Saved,
    Responded,
}

impl fmt::Display for ReviewStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Received => "received",
            Self::Extracted => "extracted",
            Self::Classified => "classified",
            Self::Explained => "explained",
            Self::Saved => "saved",
            Self::Responded => "responded",
        };
        f.write_str(name)
    }
}

/// Result of a full review.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewOutcome {
    pub classification: Classification,
    pub explanation: Explanation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<DecisionRecord>,
}

/// Which variants are active, for health reporting.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub classifier: &'static str,
    pub explainer: &'static str,
    pub storage: &'static str,
    pub persist_frames: bool,
    /// A configured model component fell back to its stand-in at startup.
    pub degraded: bool,
}

// ---------------------------------------------------------------------------
// ReviewService
// ---------------------------------------------------------------------------

pub struct ReviewService {
    extractor: FeatureExtractor,
    classifier: IncidentClassifier,
    explainer: ExplanationGenerator,
    store: Arc<DecisionRecordStore>,
    degraded: bool,
}

impl ReviewService {
    pub fn new(
        extractor: FeatureExtractor,
        classifier: IncidentClassifier,
        explainer: ExplanationGenerator,
        store: Arc<DecisionRecordStore>,
    ) -> Self {
        Self {
            extractor,
            classifier,
            explainer,
            store,
            degraded: false,
        }
    }

    /// Assemble the service from configuration and whatever models loaded.
    ///
    /// Missing models degrade the matching component instead of failing.
    /// Both models live on one server, so a non-reentrant server gets a
    /// single gate shared by the classifier and the explainer.
    pub fn from_config(
        config: &PipelineConfig,
        models: LoadedModels,
        store: Arc<DecisionRecordStore>,
    ) -> Self {
        let gate = Arc::new(ModelGate::new(models.is_reentrant()));
        let (classifier, classifier_degraded) =
            IncidentClassifier::from_config(config, models.scorer, Arc::clone(&gate));
        let (explainer, explainer_degraded) =
            ExplanationGenerator::from_config(config, models.generator, Arc::clone(&gate));

        let service = Self {
            extractor: FeatureExtractor::new(config.min_keypoint_score),
            classifier,
            explainer,
            store,
            degraded: classifier_degraded || explainer_degraded,
        };

        tracing::info!(
            classifier = service.classifier.variant(),
            explainer = service.explainer.variant(),
            storage = service.store.backend(),
            degraded = service.degraded,
            serialized_models = gate.is_serialized(),
            "Review service ready"
        );
        service
    }

    pub fn status(&self) -> ServiceStatus {
        ServiceStatus {
            classifier: self.classifier.variant(),
            explainer: self.explainer.variant(),
            storage: self.store.backend(),
            persist_frames: self.store.keeps_frames(),
            degraded: self.degraded,
        }
    }

    /// Classify a single frame.
    pub async fn analyze_frame(&self, frame: &Frame) -> Result<Classification, CoreError> {
        self.analyze(slice::from_ref(frame)).await
    }

    /// Classify an incident's frame sequence.
    ///
    /// Invalid frames fail with [`CoreError::InvalidInput`] before the
    /// classifier is consulted.
    pub async fn analyze(&self, frames: &[Frame]) -> Result<Classification, CoreError> {
        let features = self.extractor.extract(frames)?;
        trace_stage(ReviewStage::Extracted);

        let classification = match self.classifier.classify(&features).await {
            Ok(c) => c,
            Err(e @ (CoreError::ModelUnavailable(_) | CoreError::Inference(_))) => {
                tracing::warn!(error = %e, code = e.code(), "Classification failed, answering unknown");
                Classification::unknown()
            }
            Err(e) => return Err(e),
        };
        trace_stage(ReviewStage::Classified);

        tracing::debug!(
            incident_type = %classification.incident_type,
            confidence = classification.confidence,
            frames = frames.len(),
            "Incident classified"
        );
        Ok(classification)
    }

    /// Explain a classification supplied by the caller.
    ///
    /// Frames, when supplied, are validated but do not influence the text.
    pub async fn explain_incident(
        &self,
        classification: Classification,
        frames: Option<&[Frame]>,
    ) -> Result<Explanation, CoreError> {
        let classification = classification.validated()?;
        if let Some(frames) = frames {
            validate_frames(frames)?;
        }
        let explanation = self.explainer.explain(&classification).await;
        trace_stage(ReviewStage::Explained);
        Ok(explanation)
    }

    pub async fn save_results(
        &self,
        candidate: RecordCandidate,
    ) -> Result<DecisionRecord, CoreError> {
        let record = self.store.save(candidate).await?;
        trace_stage(ReviewStage::Saved);
        Ok(record)
    }

    pub async fn load_result(&self, id: &str) -> Result<DecisionRecord, CoreError> {
        self.store.load(id).await
    }

    /// Run the whole pipeline over `frames`, persisting when `persist` is set.
    pub async fn review_incident(
        &self,
        frames: Vec<Frame>,
        persist: bool,
    ) -> Result<ReviewOutcome, CoreError> {
        trace_stage(ReviewStage::Received);
        let result = self.run_review(frames, persist).await;
        match &result {
            Ok(outcome) => tracing::info!(
                stage = %ReviewStage::Responded,
                incident_type = %outcome.classification.incident_type,
                record_id = outcome.record.as_ref().map(|r| r.id.as_str()),
                "Review completed"
            ),
            Err(e) => tracing::info!(
                stage = %ReviewStage::Responded,
                code = e.code(),
                "Review failed"
            ),
        }
        result
    }

    async fn run_review(&self, frames: Vec<Frame>, persist: bool) -> Result<ReviewOutcome, CoreError> {
        let classification = self.analyze(&frames).await?;
        let explanation = self.explainer.explain(&classification).await;
        trace_stage(ReviewStage::Explained);

        let record = if persist {
            let candidate = RecordCandidate {
                classification,
                explanation: explanation.clone(),
                frames: Some(frames),
                metadata: None,
            };
            Some(self.save_results(candidate).await?)
        } else {
            None
        };

        Ok(ReviewOutcome {
            classification,
            explanation,
            record,
        })
    }
}

fn trace_stage(stage: ReviewStage) {
    tracing::trace!(%stage, "Review stage reached");
}
