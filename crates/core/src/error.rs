/// Domain error taxonomy shared by every stage of the review pipeline.
///
/// Client-caused faults (`InvalidInput`, `NotFound`) are distinguishable from
/// backend degradation (`ModelUnavailable`, `Inference`, `Generation`) and from
/// storage faults (`Persistence`).
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Persistence failed: {0}")]
    Persistence(String),

    #[error("Decision record not found: {id}")]
    NotFound { id: String },
}

impl CoreError {
    /// Stable, documented reason code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::ModelUnavailable(_) => "MODEL_UNAVAILABLE",
            Self::Inference(_) => "INFERENCE_ERROR",
            Self::Generation(_) => "GENERATION_ERROR",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
        }
    }

    /// Whether the fault was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::NotFound { .. })
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::InvalidInput(errors.to_string())
    }
}
