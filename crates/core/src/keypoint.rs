//! Pose observations submitted by the video review tool.
//!
//! A [`Frame`] is one timestamped snapshot of named 2D body landmarks. A
//! sequence of frames describes one incident and must be ordered by capture
//! time.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::FrameTime;

// ---------------------------------------------------------------------------
// Keypoint
// ---------------------------------------------------------------------------

/// A single named body landmark with its detection confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Keypoint {
    #[validate(length(min = 1, message = "keypoint name must not be empty"))]
    pub name: String,
    pub x: f64,
    pub y: f64,
    #[validate(range(min = 0.0, max = 1.0, message = "keypoint score must be within [0, 1]"))]
    pub score: f64,
}

impl Keypoint {
    pub fn new(name: impl Into<String>, x: f64, y: f64, score: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            score,
        }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.score.is_finite()
    }
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// One timestamped set of keypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Frame {
    #[validate(length(min = 1, message = "frame must contain at least one keypoint"))]
    pub keypoints: Vec<Keypoint>,
    pub timestamp: FrameTime,
}

impl Frame {
    pub fn new(keypoints: Vec<Keypoint>, timestamp: FrameTime) -> Self {
        Self {
            keypoints,
            timestamp,
        }
    }

    /// Validate a single frame.
    ///
    /// Rejects empty keypoint lists, non-finite values, scores outside
    /// `[0, 1]`, and duplicate keypoint names.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()?;

        let mut seen = HashSet::with_capacity(self.keypoints.len());
        for kp in &self.keypoints {
            if !kp.is_finite() {
                return Err(CoreError::InvalidInput(format!(
                    "keypoint '{}' at timestamp {} has non-finite values",
                    kp.name, self.timestamp
                )));
            }
            kp.validate()?;
            if !seen.insert(kp.name.as_str()) {
                return Err(CoreError::InvalidInput(format!(
                    "duplicate keypoint '{}' at timestamp {}",
                    kp.name, self.timestamp
                )));
            }
        }
        Ok(())
    }
}

/// Validate an incident's frame sequence.
///
/// The sequence must be non-empty, every frame must pass [`Frame::check`],
/// and timestamps must be non-decreasing.
pub fn validate_frames(frames: &[Frame]) -> Result<(), CoreError> {
    if frames.is_empty() {
        return Err(CoreError::InvalidInput(
            "at least one frame is required".into(),
        ));
    }

    for frame in frames {
        frame.check()?;
    }

    if let Some(pair) = frames.windows(2).find(|w| w[1].timestamp < w[0].timestamp) {
        return Err(CoreError::InvalidInput(format!(
            "frame timestamps must be non-decreasing ({} follows {})",
            pair[1].timestamp, pair[0].timestamp
        )));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn frame(ts: FrameTime) -> Frame {
        Frame::new(vec![Keypoint::new("left_ankle", 0.1, 0.2, 0.9)], ts)
    }

    #[test]
    fn valid_sequence_passes() {
        assert!(validate_frames(&[frame(1000), frame(1000), frame(1033)]).is_ok());
    }

    #[test]
    fn empty_sequence_is_rejected() {
        assert_matches!(validate_frames(&[]), Err(CoreError::InvalidInput(_)));
    }

    #[test]
    fn frame_without_keypoints_is_rejected() {
        let empty = Frame::new(vec![], 1000);
        assert_matches!(validate_frames(&[empty]), Err(CoreError::InvalidInput(_)));
    }

    #[test]
    fn decreasing_timestamps_are_rejected() {
        let err = validate_frames(&[frame(2000), frame(1000)]).unwrap_err();
        assert_matches!(err, CoreError::InvalidInput(msg) if msg.contains("non-decreasing"));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let f = Frame::new(
            vec![
                Keypoint::new("nose", 0.5, 0.1, 0.8),
                Keypoint::new("nose", 0.6, 0.1, 0.7),
            ],
            1000,
        );
        assert_matches!(f.check(), Err(CoreError::InvalidInput(msg)) if msg.contains("duplicate"));
    }

    #[test]
    fn out_of_range_score_is_rejected() {
        let f = Frame::new(vec![Keypoint::new("nose", 0.5, 0.1, 1.5)], 1000);
        assert_matches!(f.check(), Err(CoreError::InvalidInput(_)));
    }

    #[test]
    fn nan_coordinate_is_rejected() {
        let f = Frame::new(vec![Keypoint::new("nose", f64::NAN, 0.1, 0.5)], 1000);
        assert_matches!(f.check(), Err(CoreError::InvalidInput(msg)) if msg.contains("non-finite"));
    }

    #[test]
    fn frame_deserializes_from_review_tool_payload() {
        let json = serde_json::json!({
            "keypoints": [{ "name": "ankle", "x": 0.1, "y": 0.2, "score": 0.9 }],
            "timestamp": 1000
        });
        let f: Frame = serde_json::from_value(json).unwrap();
        assert_eq!(f.timestamp, 1000);
        assert_eq!(f.keypoints[0], Keypoint::new("ankle", 0.1, 0.2, 0.9));
    }
}
