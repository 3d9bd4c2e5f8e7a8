//! Model-provider capabilities for incident review.
//!
//! Defines the outbound [`ScoringModel`] and [`TextGenerator`] traits, an
//! HTTP client for a model server that exposes both, and startup loading
//! that degrades to "no model" instead of failing.

pub mod api;
pub mod loader;
pub mod provider;
pub mod remote;

pub use loader::{load_models, LoadedModels};
pub use provider::{ModelError, RawScore, ScoringModel, TextGenerator};
