//! The storage-medium contract: write a named structured payload, read it back.
//!
//! Media never overwrite: writing a name that already exists fails with
//! [`StoreError::AlreadyExists`].

use var_core::error::CoreError;

/// Errors raised by a storage medium.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Artifact already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid artifact name: {0}")]
    InvalidName(String),

    #[error("Invalid store configuration: {0}")]
    Config(String),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        CoreError::Persistence(err.to_string())
    }
}

/// An opaque, append-only backing medium for decision records.
#[async_trait::async_trait]
pub trait StorageMedium: Send + Sync {
    /// Short backend identifier (`"local"`, `"postgres"`).
    fn kind(&self) -> &'static str;

    /// Durably write `payload` under `name`. Returns only after the medium's
    /// durability guarantee holds.
    async fn write(&self, name: &str, payload: &serde_json::Value) -> Result<(), StoreError>;

    /// Read the payload stored under `name`, if any.
    async fn read(&self, name: &str) -> Result<Option<serde_json::Value>, StoreError>;
}

/// Artifact names are restricted to `[A-Za-z0-9._-]` and may not start with
/// a dot, so they are safe as file names and keys alike.
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if name.is_empty() || name.starts_with('.') || !valid_chars {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}
