//! Gateway error types.
//!
//! The ingestion core distinguishes frame decoding, store and session
//! failures; [`GatewayError`] is the HTTP-facing error of the read view and
//! maps each variant to a status code and structured JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 3001,
///     "message": "store error: connection refused"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// An inbound frame could not be decoded into a sensor report.
#[derive(Debug, thiserror::Error)]
pub enum FrameDecodeError {
    /// Payload is not valid JSON, or a field has the wrong type.
    #[error("malformed frame: {0}")]
    Json(#[from] serde_json::Error),

    /// Payload is valid JSON but not an object.
    #[error("frame is not a JSON object")]
    NotAnObject,
}

/// Failure of the reading store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing database rejected or failed the operation.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Opening a connection to the backing database took too long.
    #[error("timed out connecting to the database after {0} s")]
    ConnectTimeout(u64),
}

/// Reason a device session terminated abnormally.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The transport went away while a duty was writing to it.
    #[error("connection closed")]
    ConnectionClosed,

    /// The transport reported an error while reading.
    #[error("transport error: {0}")]
    Transport(String),

    /// Persisting a reading failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// A `start`/`end` query value did not match `YYYY-MM-DDTHH:MM`.
#[derive(Debug, thiserror::Error)]
#[error("invalid {field} timestamp {value:?}: expected YYYY-MM-DDTHH:MM")]
pub struct RangeParseError {
    /// Which bound failed to parse (`"start"` or `"end"`).
    pub field: &'static str,
    /// The raw value received.
    pub value: String,
}

/// Configuration could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An address variable is set but is not a valid socket address.
    #[error("{key} is not a valid socket address: {source}")]
    InvalidAddr {
        /// Environment variable name.
        key: &'static str,
        /// Underlying parse failure.
        source: std::net::AddrParseError,
    },
}

/// Read-view error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category   | HTTP Status               |
/// |-----------|------------|---------------------------|
/// | 1000-1999 | Validation | 400 Bad Request           |
/// | 3000-3999 | Server     | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The request body is missing or malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Reading store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::Store(_) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "read view request failed");
        } else {
            tracing::warn!(error = %self, "read view request rejected");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
