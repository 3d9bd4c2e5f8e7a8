//! Incident classification and explanation pipeline.
//!
//! Frames are turned into features, classified, explained, and optionally
//! persisted by [`ReviewService`](service::ReviewService). Model-backed
//! components degrade to deterministic fallbacks so the pipeline always
//! produces a result; only invalid input and storage faults are surfaced.

pub mod classifier;
pub mod config;
pub mod explainer;
pub mod gate;
pub mod service;

pub use config::PipelineConfig;
pub use service::ReviewService;
