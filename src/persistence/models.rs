//! Database model for stored readings.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A row of the `sensor_data` table.
///
/// Field names match the column names and the probe's wire names so the
/// JSON listing reads the same as what the probe sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StoredReading {
    /// Auto-increment row ID.
    pub id: i64,
    /// Total dissolved solids, if reported.
    pub tdsvalue: Option<f64>,
    /// Turbidity, if reported.
    pub turbidityvalue: Option<f64>,
    /// pH, if reported.
    pub phvalue: Option<f64>,
    /// Server-observed time of insertion (UTC, no zone).
    pub timestamp: NaiveDateTime,
}

/// Column tuple as returned by `SELECT id, tdsvalue, turbidityvalue,
/// phvalue, "timestamp"`.
pub(crate) type ReadingRow = (i64, Option<f64>, Option<f64>, Option<f64>, NaiveDateTime);

impl From<ReadingRow> for StoredReading {
    fn from((id, tdsvalue, turbidityvalue, phvalue, timestamp): ReadingRow) -> Self {
        Self {
            id,
            tdsvalue,
            turbidityvalue,
            phvalue,
            timestamp,
        }
    }
}
