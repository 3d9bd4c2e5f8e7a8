//! Append-only decision record store.
//!
//! `save` assigns a unique id and timestamp, serializes the record, and
//! writes it to the medium. There is no update or delete.
//!
//! Ids look like `20250101T120000-000042-9f3a6c21`: the UTC save second, a
//! per-process sequence number, and 32 random bits. The sequence separates
//! saves within one process; the random suffix separates processes sharing
//! a medium.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use var_core::error::CoreError;
use var_core::record::{DecisionRecord, RecordCandidate};

use crate::medium::{StorageMedium, StoreError};

/// Prefix of every persisted artifact name.
pub const ARTIFACT_PREFIX: &str = "results_";

/// Extension of every persisted artifact name.
pub const ARTIFACT_EXTENSION: &str = ".json";

/// Artifact name for a record id.
pub fn artifact_name(id: &str) -> String {
    format!("{ARTIFACT_PREFIX}{id}{ARTIFACT_EXTENSION}")
}

pub struct DecisionRecordStore {
    medium: Arc<dyn StorageMedium>,
    keep_frames: bool,
    sequence: AtomicU64,
}

impl DecisionRecordStore {
    /// * `keep_frames` - whether submitted frame sequences are persisted
    ///   alongside the decision or dropped for storage economy.
    pub fn new(medium: Arc<dyn StorageMedium>, keep_frames: bool) -> Self {
        Self {
            medium,
            keep_frames,
            sequence: AtomicU64::new(0),
        }
    }

    pub fn backend(&self) -> &'static str {
        self.medium.kind()
    }

    pub fn keeps_frames(&self) -> bool {
        self.keep_frames
    }

    /// Persist a candidate and return the created record.
    ///
    /// Fails with [`CoreError::InvalidInput`] for malformed candidates and
    /// [`CoreError::Persistence`] for any storage fault.
    pub async fn save(&self, candidate: RecordCandidate) -> Result<DecisionRecord, CoreError> {
        let candidate = candidate.validated()?;

        let saved_at = Utc::now();
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let id = format!(
            "{}-{seq:06}-{:08x}",
            saved_at.format("%Y%m%dT%H%M%S"),
            rand::random::<u32>()
        );

        let record = DecisionRecord::from_candidate(id, saved_at, candidate, self.keep_frames);
        let payload = serde_json::to_value(&record)
            .map_err(|e| CoreError::Persistence(format!("failed to serialize record: {e}")))?;

        let name = artifact_name(&record.id);
        if let Err(e) = self.medium.write(&name, &payload).await {
            tracing::error!(error = %e, artifact = %name, backend = self.backend(), "Failed to persist decision record");
            return Err(e.into());
        }

        tracing::info!(
            id = %record.id,
            incident_type = %record.classification.incident_type,
            backend = self.backend(),
            "Decision record saved"
        );
        Ok(record)
    }

    /// Load a previously saved record.
    pub async fn load(&self, id: &str) -> Result<DecisionRecord, CoreError> {
        let name = artifact_name(id);
        let payload = self
            .medium
            .read(&name)
            .await
            .map_err(|e| match e {
                StoreError::InvalidName(_) => {
                    CoreError::InvalidInput(format!("invalid record id '{id}'"))
                }
                other => other.into(),
            })?
            .ok_or_else(|| CoreError::NotFound { id: id.to_string() })?;

        serde_json::from_value(payload)
            .map_err(|e| CoreError::Persistence(format!("stored record '{id}' is corrupt: {e}")))
    }
}
