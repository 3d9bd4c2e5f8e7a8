//! Domain model for incident review.
//!
//! Pose observations, incident classifications, explanations, decision
//! records, the error taxonomy, and the feature extractor. Pure types and
//! functions; no I/O.

pub mod error;
pub mod features;
pub mod incident;
pub mod keypoint;
pub mod record;
pub mod types;
