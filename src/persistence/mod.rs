//! Persistence layer: the reading store.
//!
//! [`ReadingStore`] is the capability the session engine writes through and
//! the read view queries. [`PostgresReadingStore`] is the durable backend;
//! [`InMemoryReadingStore`] backs tests and runs with persistence disabled.
//! [`StoreBackend`] selects one of them from configuration.

pub mod memory;
pub mod models;
pub mod postgres;

use std::future::Future;

use crate::config::GatewayConfig;
use crate::domain::{Reading, TimeRange};
use crate::error::StoreError;

pub use memory::InMemoryReadingStore;
pub use models::StoredReading;
pub use postgres::PostgresReadingStore;

/// Append-only store of sensor readings.
pub trait ReadingStore: std::fmt::Debug + Send + Sync + 'static {
    /// Appends one row stamped with the server-observed time and returns it.
    fn record(
        &self,
        reading: Reading,
    ) -> impl Future<Output = Result<StoredReading, StoreError>> + Send;

    /// Returns stored rows newest first, restricted to `range` when given.
    fn query(
        &self,
        range: Option<TimeRange>,
    ) -> impl Future<Output = Result<Vec<StoredReading>, StoreError>> + Send;
}

/// The store selected at startup.
#[derive(Debug)]
pub enum StoreBackend {
    /// PostgreSQL, one connection per call.
    Postgres(PostgresReadingStore),
    /// Process-local memory.
    Memory(InMemoryReadingStore),
}

impl StoreBackend {
    /// Builds the backend named by `config.persistence_enabled`, creating
    /// the readings table if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the database URL is invalid or the schema
    /// cannot be provisioned.
    pub async fn from_config(config: &GatewayConfig) -> Result<Self, StoreError> {
        if !config.persistence_enabled {
            tracing::warn!("persistence disabled, readings are kept in memory only");
            return Ok(Self::Memory(InMemoryReadingStore::new()));
        }
        let store =
            PostgresReadingStore::new(&config.database_url, config.database_connect_timeout())?;
        store.ensure_schema().await?;
        Ok(Self::Postgres(store))
    }
}

impl ReadingStore for StoreBackend {
    async fn record(&self, reading: Reading) -> Result<StoredReading, StoreError> {
        match self {
            Self::Postgres(store) => store.record(reading).await,
            Self::Memory(store) => store.record(reading).await,
        }
    }

    async fn query(&self, range: Option<TimeRange>) -> Result<Vec<StoredReading>, StoreError> {
        match self {
            Self::Postgres(store) => store.query(range).await,
            Self::Memory(store) => store.query(range).await,
        }
    }
}
