//! Durable storage of decision records.
//!
//! [`DecisionRecordStore`](store::DecisionRecordStore) assigns ids and
//! serializes records; the bytes land on an opaque
//! [`StorageMedium`](medium::StorageMedium): a local directory or a
//! PostgreSQL table.

use sqlx::postgres::PgPoolOptions;

pub mod config;
pub mod local;
pub mod medium;
pub mod postgres;
pub mod store;

pub use config::{open_store, StorageBackend, StoreConfig};
pub use medium::{StorageMedium, StoreError};
pub use store::DecisionRecordStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply embedded migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
