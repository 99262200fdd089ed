//! Process-local reading store.

use chrono::{NaiveDateTime, Utc};
use tokio::sync::RwLock;

use super::ReadingStore;
use super::models::StoredReading;
use crate::domain::{Reading, TimeRange};
use crate::error::StoreError;

/// Reading store kept in a `Vec` behind a [`tokio::sync::RwLock`].
///
/// Rows are never removed; ids are assigned in insertion order starting at 1.
#[derive(Debug, Default)]
pub struct InMemoryReadingStore {
    rows: RwLock<Vec<StoredReading>>,
}

impl InMemoryReadingStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a reading with an explicit timestamp.
    pub async fn record_at(&self, reading: Reading, timestamp: NaiveDateTime) -> StoredReading {
        let mut rows = self.rows.write().await;
        let id = rows.last().map_or(1, |row| row.id + 1);
        let row = StoredReading {
            id,
            tdsvalue: reading.tds,
            turbidityvalue: reading.turbidity,
            phvalue: reading.ph,
            timestamp,
        };
        rows.push(row.clone());
        row
    }

    /// Returns the number of stored rows.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

impl ReadingStore for InMemoryReadingStore {
    async fn record(&self, reading: Reading) -> Result<StoredReading, StoreError> {
        Ok(self.record_at(reading, Utc::now().naive_utc()).await)
    }

    async fn query(&self, range: Option<TimeRange>) -> Result<Vec<StoredReading>, StoreError> {
        let rows = self.rows.read().await;
        let mut matched: Vec<StoredReading> = rows
            .iter()
            .filter(|row| range.is_none_or(|r| r.contains(row.timestamp)))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(matched)
    }
}
