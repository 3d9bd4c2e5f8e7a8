use std::str::FromStr;
use std::time::Duration;

use var_core::features::DEFAULT_MIN_KEYPOINT_SCORE;

/// Default bound on generated explanation length, in whitespace tokens.
pub const DEFAULT_GENERATION_MAX_TOKENS: usize = 200;

/// Default soft timeout on a single generation call.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_millis(5000);

/// Default soft timeout on a single scoring call.
pub const DEFAULT_INFERENCE_TIMEOUT: Duration = Duration::from_millis(2000);

/// Which classifier variant to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierKind {
    Model,
    Mock,
}

impl FromStr for ClassifierKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "model" => Ok(Self::Model),
            "mock" => Ok(Self::Mock),
            other => Err(format!("unknown classifier '{other}' (expected: model, mock)")),
        }
    }
}

/// Which explanation generator variant to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplainerKind {
    Generative,
    Templated,
}

impl FromStr for ExplainerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generative" => Ok(Self::Generative),
            "templated" => Ok(Self::Templated),
            other => Err(format!(
                "unknown explainer '{other}' (expected: generative, templated)"
            )),
        }
    }
}

/// Pipeline configuration, fixed for the process lifetime.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub classifier: ClassifierKind,
    pub explainer: ExplainerKind,
    /// Keypoints scoring below this are masked out of the features.
    pub min_keypoint_score: f64,
    pub inference_timeout: Duration,
    pub generation_timeout: Duration,
    pub generation_max_tokens: usize,
    /// Seeds the mock classifier; `None` draws from the OS.
    pub mock_seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierKind::Model,
            explainer: ExplainerKind::Generative,
            min_keypoint_score: DEFAULT_MIN_KEYPOINT_SCORE,
            inference_timeout: DEFAULT_INFERENCE_TIMEOUT,
            generation_timeout: DEFAULT_GENERATION_TIMEOUT,
            generation_max_tokens: DEFAULT_GENERATION_MAX_TOKENS,
            mock_seed: None,
        }
    }
}
