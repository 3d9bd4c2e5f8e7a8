//! PostgreSQL storage medium backed by the `decision_records` table.
//!
//! Each write is a single-row INSERT (committed on return). A duplicate
//! name violates the primary key and is reported, never upserted.

use crate::medium::{validate_name, StorageMedium, StoreError};
use crate::DbPool;

/// PostgreSQL unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

pub struct PgMedium {
    pool: DbPool,
}

impl PgMedium {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl StorageMedium for PgMedium {
    fn kind(&self) -> &'static str {
        "postgres"
    }

    async fn write(&self, name: &str, payload: &serde_json::Value) -> Result<(), StoreError> {
        validate_name(name)?;

        let result = sqlx::query("INSERT INTO decision_records (name, payload) VALUES ($1, $2)")
            .bind(name)
            .bind(payload)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                Err(StoreError::AlreadyExists(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn read(&self, name: &str) -> Result<Option<serde_json::Value>, StoreError> {
        validate_name(name)?;

        let payload = sqlx::query_scalar::<_, serde_json::Value>(
            "SELECT payload FROM decision_records WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payload)
    }
}
