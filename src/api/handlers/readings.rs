//! Reading handlers: HTML page, JSON listing and HTTP submission.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{
    CreateReadingRequest, RangeParams, ReadingCreatedResponse, ReadingListResponse,
};
use crate::api::render;
use crate::app_state::ViewState;
use crate::error::{ErrorResponse, GatewayError};
use crate::persistence::ReadingStore;

/// `GET /`: HTML table of readings, newest first.
///
/// A malformed or half-specified range is ignored and every reading is
/// listed; the raw `start`/`end` values are still echoed into the form.
///
/// # Errors
///
/// Returns [`GatewayError::Store`] if the store query fails.
pub async fn readings_page(
    State(state): State<ViewState>,
    Query(params): Query<RangeParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let readings = state.store.query(params.time_range()).await?;
    Ok(Html(render::readings_page(
        &readings,
        params.start.as_deref(),
        params.end.as_deref(),
    )))
}

/// `GET /data`: JSON listing of readings, newest first.
///
/// # Errors
///
/// Returns [`GatewayError::Store`] if the store query fails.
#[utoipa::path(
    get,
    path = "/data",
    tag = "Readings",
    summary = "List readings",
    description = "Returns stored readings newest first. When both `start` and `end` are valid `YYYY-MM-DDTHH:MM` values only readings within that inclusive range are returned; otherwise the filter is ignored.",
    params(RangeParams),
    responses(
        (status = 200, description = "Readings, newest first", body = ReadingListResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn list_readings(
    State(state): State<ViewState>,
    Query(params): Query<RangeParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let data = state.store.query(params.time_range()).await?;
    Ok(Json(ReadingListResponse { data }))
}

/// `POST /data`: store one complete reading sent over HTTP.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] unless the body is a JSON object
/// with numeric `tdsvalue`, `turbidityvalue` and `phvalue`, and
/// [`GatewayError::Store`] if the insert fails.
#[utoipa::path(
    post,
    path = "/data",
    tag = "Readings",
    summary = "Submit a reading",
    description = "Stores one reading stamped with the server time. Unlike the WebSocket path, all three measurements are required.",
    request_body = CreateReadingRequest,
    responses(
        (status = 201, description = "Reading stored", body = ReadingCreatedResponse),
        (status = 400, description = "Invalid or missing sensor data", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn create_reading(
    State(state): State<ViewState>,
    payload: Result<Json<CreateReadingRequest>, JsonRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let Json(request) = payload.map_err(|rejection| {
        GatewayError::InvalidRequest(format!(
            "invalid or missing sensor data: {}",
            rejection.body_text()
        ))
    })?;
    let data = state.store.record(request.into()).await?;
    tracing::info!(row_id = data.id, "reading submitted over http");
    Ok((
        StatusCode::CREATED,
        Json(ReadingCreatedResponse {
            message: "Data inserted successfully".to_string(),
            data,
        }),
    ))
}

/// Reading routes mounted at the root level.
pub fn routes() -> Router<ViewState> {
    Router::new()
        .route("/", get(readings_page))
        .route("/data", get(list_readings).post(create_reading))
}
