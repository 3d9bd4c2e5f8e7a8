//! Incident labels, classifications, and explanations.
//!
//! `IncidentType` has six concrete labels plus `Unknown`, which is reserved
//! for inputs the classifier cannot label. An `Unknown` classification always
//! carries a confidence of zero.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// IncidentType
// ---------------------------------------------------------------------------

/// A classified in-game event.
///
/// Deserializing an unrecognised label yields [`IncidentType::Unknown`]
/// rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncidentType {
    Foul,
    Offside,
    Handball,
    Goal,
    Corner,
    ThrowIn,
    #[serde(other)]
    Unknown,
}

impl IncidentType {
    /// The six labels a classifier may produce.
    pub const LABELED: [IncidentType; 6] = [
        Self::Foul,
        Self::Offside,
        Self::Handball,
        Self::Goal,
        Self::Corner,
        Self::ThrowIn,
    ];

    /// Wire name, e.g. `"throw-in"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Foul => "foul",
            Self::Offside => "offside",
            Self::Handball => "handball",
            Self::Goal => "goal",
            Self::Corner => "corner",
            Self::ThrowIn => "throw-in",
            Self::Unknown => "unknown",
        }
    }

    /// Parse one of the six labels. Returns `None` for anything else,
    /// including `"unknown"`.
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_lowercase().replace('_', "-");
        Self::LABELED
            .into_iter()
            .find(|t| t.as_str() == normalized)
    }
}

impl fmt::Display for IncidentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// An incident label with the classifier's self-reported certainty in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub incident_type: IncidentType,
    pub confidence: f64,
}

impl Classification {
    /// Build a classification, clamping confidence into `[0, 1]`.
    ///
    /// A non-finite confidence or an `Unknown` label yields a confidence of 0.
    pub fn new(incident_type: IncidentType, confidence: f64) -> Self {
        let confidence = if incident_type == IncidentType::Unknown || !confidence.is_finite() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            incident_type,
            confidence,
        }
    }

    /// The "cannot label" result.
    pub fn unknown() -> Self {
        Self {
            incident_type: IncidentType::Unknown,
            confidence: 0.0,
        }
    }

    /// Validate a classification received from a caller.
    ///
    /// Rejects confidences that are non-finite or outside `[0, 1]`, and
    /// normalizes `Unknown` to a confidence of 0.
    pub fn validated(self) -> Result<Self, CoreError> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(CoreError::InvalidInput(format!(
                "confidence must be within [0, 1], got {}",
                self.confidence
            )));
        }
        Ok(Self::new(self.incident_type, self.confidence))
    }

    /// Confidence formatted to two decimal places, as appended to explanations.
    pub fn formatted_confidence(&self) -> String {
        format!("{:.2}", self.confidence)
    }
}

// ---------------------------------------------------------------------------
// Explanation
// ---------------------------------------------------------------------------

/// Which generator produced an explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationSource {
    Generative,
    Templated,
}

/// A natural-language justification for one classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    /// Never empty; always ends with the formatted confidence.
    pub text: String,
    pub generated_at: Timestamp,
    pub source: ExplanationSource,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
