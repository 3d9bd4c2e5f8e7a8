//! Store selection and startup.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::local::LocalMedium;
use crate::medium::{StorageMedium, StoreError};
use crate::postgres::PgMedium;
use crate::store::DecisionRecordStore;

/// Which medium decision records are written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Local,
    Postgres,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(format!(
                "unknown storage backend '{other}' (expected: local, postgres)"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StorageBackend,
    /// Directory of the local medium.
    pub results_dir: PathBuf,
    /// Required for [`StorageBackend::Postgres`].
    pub database_url: Option<String>,
    /// Keep submitted frame sequences in persisted records.
    pub persist_frames: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Local,
            results_dir: PathBuf::from("./results"),
            database_url: None,
            persist_frames: true,
        }
    }
}

/// Open the configured medium and wrap it in a store.
///
/// For PostgreSQL this connects, checks the connection and applies the
/// embedded migrations before returning.
pub async fn open_store(config: &StoreConfig) -> Result<DecisionRecordStore, StoreError> {
    let medium: Arc<dyn StorageMedium> = match config.backend {
        StorageBackend::Local => {
            tracing::info!(dir = %config.results_dir.display(), "Using local decision record store");
            Arc::new(LocalMedium::new(config.results_dir.clone()))
        }
        StorageBackend::Postgres => {
            let url = config.database_url.as_deref().ok_or_else(|| {
                StoreError::Config("DATABASE_URL must be set for the postgres backend".into())
            })?;

            let pool = crate::create_pool(url).await?;
            tracing::info!("Database connection pool created");

            crate::health_check(&pool).await?;
            tracing::info!("Database health check passed");

            crate::run_migrations(&pool).await?;
            tracing::info!("Database migrations applied");

            Arc::new(PgMedium::new(pool))
        }
    };

    Ok(DecisionRecordStore::new(medium, config.persist_frames))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_names_parse() {
        assert_eq!("local".parse(), Ok(StorageBackend::Local));
        assert_eq!(" Postgres ".parse(), Ok(StorageBackend::Postgres));
        assert!("s3".parse::<StorageBackend>().is_err());
    }

    #[tokio::test]
    async fn postgres_without_url_fails() {
        let config = StoreConfig {
            backend: StorageBackend::Postgres,
            ..StoreConfig::default()
        };
        assert!(matches!(
            open_store(&config).await,
            Err(StoreError::Config(_))
        ));
    }

    #[tokio::test]
    async fn local_store_keeps_frame_policy() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            results_dir: dir.path().to_path_buf(),
            persist_frames: false,
            ..StoreConfig::default()
        };
        let store = open_store(&config).await.unwrap();
        assert_eq!(store.backend(), "local");
        assert!(!store.keeps_frames());
    }
}
