//! Feature extraction from keypoint frames.
//!
//! Each frame becomes one row of [`ROW_WIDTH`] values: 17 landmark slots in
//! COCO/MoveNet order, each holding `(x, y, score)`.
//!
//! ```text
//! slot  0: nose            slot  9: left_wrist
//! slot  1: left_eye        slot 10: right_wrist
//! slot  2: right_eye       slot 11: left_hip
//! slot  3: left_ear        slot 12: right_hip
//! slot  4: right_ear       slot 13: left_knee
//! slot  5: left_shoulder   slot 14: right_knee
//! slot  6: right_shoulder  slot 15: left_ankle
//! slot  7: left_elbow      slot 16: right_ankle
//! slot  8: right_elbow
//! ```
//!
//! Keypoints with other names fill the slots left empty by the frame, in
//! name order; whatever does not fit is dropped. Keypoints scoring below the
//! configured minimum are masked to zeros.

use serde::Serialize;

use crate::error::CoreError;
use crate::keypoint::{validate_frames, Frame, Keypoint};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Canonical landmark order.
pub const CANONICAL_KEYPOINTS: [&str; 17] = [
    "nose",
    "left_eye",
    "right_eye",
    "left_ear",
    "right_ear",
    "left_shoulder",
    "right_shoulder",
    "left_elbow",
    "right_elbow",
    "left_wrist",
    "right_wrist",
    "left_hip",
    "right_hip",
    "left_knee",
    "right_knee",
    "left_ankle",
    "right_ankle",
];

/// Values stored per landmark slot.
pub const VALUES_PER_KEYPOINT: usize = 3;

/// Width of one feature row.
pub const ROW_WIDTH: usize = CANONICAL_KEYPOINTS.len() * VALUES_PER_KEYPOINT;

/// Keypoints below this score are treated as not detected.
pub const DEFAULT_MIN_KEYPOINT_SCORE: f64 = 0.3;

// ---------------------------------------------------------------------------
// FeatureMatrix
// ---------------------------------------------------------------------------

/// Row-major feature matrix, one row per frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureMatrix {
    rows: usize,
    values: Vec<f32>,
}

impl FeatureMatrix {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn width(&self) -> usize {
        ROW_WIDTH
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn row(&self, index: usize) -> Option<&[f32]> {
        self.values.chunks_exact(ROW_WIDTH).nth(index)
    }

    /// True when there is nothing to classify: no rows, or every value is zero.
    pub fn is_degenerate(&self) -> bool {
        self.rows == 0 || self.values.iter().all(|v| *v == 0.0)
    }
}

// ---------------------------------------------------------------------------
// FeatureExtractor
// ---------------------------------------------------------------------------

/// Maps validated frames into a [`FeatureMatrix`]. Pure and deterministic.
#[derive(Debug, Clone, Copy)]
pub struct FeatureExtractor {
    min_score: f64,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_KEYPOINT_SCORE)
    }
}

impl FeatureExtractor {
    pub fn new(min_score: f64) -> Self {
        Self {
            min_score: min_score.clamp(0.0, 1.0),
        }
    }

    /// Extract features from an incident's frames.
    ///
    /// Fails with [`CoreError::InvalidInput`] when `frames` is empty, a frame
    /// has no keypoints, or any frame is otherwise malformed.
    pub fn extract(&self, frames: &[Frame]) -> Result<FeatureMatrix, CoreError> {
        validate_frames(frames)?;

        let mut values = Vec::with_capacity(frames.len() * ROW_WIDTH);
        for frame in frames {
            values.extend_from_slice(&self.frame_row(frame));
        }

        Ok(FeatureMatrix {
            rows: frames.len(),
            values,
        })
    }

    fn frame_row(&self, frame: &Frame) -> [f32; ROW_WIDTH] {
        let mut slots: [Option<&Keypoint>; 17] = [None; 17];
        let mut extras: Vec<&Keypoint> = Vec::new();

        for kp in &frame.keypoints {
            match CANONICAL_KEYPOINTS.iter().position(|n| *n == kp.name) {
                Some(idx) => slots[idx] = Some(kp),
                None => extras.push(kp),
            }
        }

        extras.sort_by(|a, b| a.name.cmp(&b.name));
        let mut extras = extras.into_iter();
        for slot in slots.iter_mut().filter(|s| s.is_none()) {
            match extras.next() {
                Some(kp) => *slot = Some(kp),
                None => break,
            }
        }

        let mut row = [0.0f32; ROW_WIDTH];
        for (idx, kp) in slots.iter().enumerate() {
            let Some(kp) = kp else { continue };
            if kp.score < self.min_score {
                continue;
            }
            let base = idx * VALUES_PER_KEYPOINT;
            row[base] = kp.x as f32;
            row[base + 1] = kp.y as f32;
            row[base + 2] = kp.score as f32;
        }
        row
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
