//! Decision records: the durable audit artifact of a review.
//!
//! A [`RecordCandidate`] is what a caller submits; the store assigns an id
//! and a `saved_at` timestamp and turns it into an immutable
//! [`DecisionRecord`].

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::incident::{Classification, Explanation};
use crate::keypoint::{validate_frames, Frame};
use crate::types::Timestamp;

/// A decision awaiting persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordCandidate {
    pub classification: Classification,
    pub explanation: Explanation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames: Option<Vec<Frame>>,
    /// Arbitrary caller-supplied context, stored verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl RecordCandidate {
    /// Reject candidates that would produce a malformed record and return
    /// the candidate with its classification normalized (an `unknown` label
    /// always carries confidence 0).
    pub fn validated(mut self) -> Result<Self, CoreError> {
        self.classification = self.classification.validated()?;
        if self.explanation.text.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "explanation text must not be empty".into(),
            ));
        }
        if let Some(frames) = &self.frames {
            validate_frames(frames)?;
        }
        Ok(self)
    }
}

/// A persisted decision. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub id: String,
    pub classification: Classification,
    pub explanation: Explanation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames: Option<Vec<Frame>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    pub saved_at: Timestamp,
}

impl DecisionRecord {
    /// Materialize a candidate under a store-assigned id.
    ///
    /// Frames are dropped when `keep_frames` is false.
    pub fn from_candidate(
        id: String,
        saved_at: Timestamp,
        candidate: RecordCandidate,
        keep_frames: bool,
    ) -> Self {
        Self {
            id,
            classification: candidate.classification,
            explanation: candidate.explanation,
            frames: candidate.frames.filter(|_| keep_frames),
            metadata: candidate.metadata,
            saved_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;

    use super::*;
    use crate::incident::{ExplanationSource, IncidentType};
    use crate::keypoint::Keypoint;

    fn candidate() -> RecordCandidate {
        RecordCandidate {
            classification: Classification::new(IncidentType::Corner, 0.8),
            explanation: Explanation {
                text: "Defending player was the last to touch the ball. Confidence level: 0.80"
                    .into(),
                generated_at: Utc::now(),
                source: ExplanationSource::Templated,
            },
            frames: Some(vec![Frame::new(
                vec![Keypoint::new("left_wrist", 0.3, 0.4, 0.7)],
                10,
            )]),
            metadata: Some(serde_json::json!({ "match": "A-B" })),
        }
    }

    #[test]
    fn frames_are_dropped_when_not_kept() {
        let record = DecisionRecord::from_candidate("r1".into(), Utc::now(), candidate(), false);
        assert!(record.frames.is_none());
        assert_eq!(record.metadata, Some(serde_json::json!({ "match": "A-B" })));
    }

    #[test]
    fn frames_are_kept_when_requested() {
        let record = DecisionRecord::from_candidate("r1".into(), Utc::now(), candidate(), true);
        assert_eq!(record.frames.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn empty_explanation_is_rejected() {
        let mut c = candidate();
        c.explanation.text = "   ".into();
        assert_matches!(c.validated(), Err(CoreError::InvalidInput(_)));
    }

    #[test]
    fn invalid_frames_are_rejected() {
        let mut c = candidate();
        c.frames = Some(vec![]);
        assert_matches!(c.validated(), Err(CoreError::InvalidInput(_)));
    }

    #[test]
    fn unknown_label_is_normalized_to_zero_confidence() {
        let mut c = candidate();
        c.classification = Classification {
            incident_type: IncidentType::Unknown,
            confidence: 0.8,
        };
        let c = c.validated().unwrap();
        assert_eq!(c.classification, Classification::unknown());
    }
}
