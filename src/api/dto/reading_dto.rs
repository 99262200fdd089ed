//! Reading listing and submission DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Reading, TimeRange};
use crate::persistence::StoredReading;

/// Optional `start`/`end` query parameters, format `YYYY-MM-DDTHH:MM`.
///
/// The raw strings are kept so the page can echo them back even when they
/// do not parse.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RangeParams {
    /// Inclusive lower bound, e.g. `2024-01-01T00:00`.
    #[serde(default)]
    pub start: Option<String>,
    /// Inclusive upper bound, e.g. `2024-01-02T00:00`.
    #[serde(default)]
    pub end: Option<String>,
}

impl RangeParams {
    /// The filter to apply, or `None` for all readings.
    #[must_use]
    pub fn time_range(&self) -> Option<TimeRange> {
        TimeRange::from_params(self.start.as_deref(), self.end.as_deref())
    }
}

/// Response body for `GET /data`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadingListResponse {
    /// Readings, newest first.
    pub data: Vec<StoredReading>,
}

/// Request body for `POST /data`. All three measurements are required.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct CreateReadingRequest {
    /// Total dissolved solids.
    #[schema(example = 120.0)]
    pub tdsvalue: f64,
    /// Turbidity.
    #[schema(example = 3.0)]
    pub turbidityvalue: f64,
    /// pH.
    #[schema(example = 7.1)]
    pub phvalue: f64,
}

impl From<CreateReadingRequest> for Reading {
    fn from(req: CreateReadingRequest) -> Self {
        Self::new(Some(req.tdsvalue), Some(req.turbidityvalue), Some(req.phvalue))
    }
}

/// Response body for `POST /data`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadingCreatedResponse {
    /// Confirmation message.
    pub message: String,
    /// The stored row.
    pub data: StoredReading,
}
