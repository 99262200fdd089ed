//! Read view: HTML and JSON listings of stored readings, plus an HTTP
//! submission path for complete readings.
//!
//! Runs as its own service and shares nothing with the ingestion side
//! except the reading store.

pub mod dto;
pub mod handlers;
pub mod render;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::app_state::ViewState;

/// OpenAPI document for the JSON endpoints.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "water-quality-gateway read view"),
    paths(
        handlers::readings::list_readings,
        handlers::readings::create_reading,
        handlers::system::health_handler,
    ),
    components(schemas(
        dto::ReadingListResponse,
        dto::CreateReadingRequest,
        dto::ReadingCreatedResponse,
        crate::persistence::StoredReading,
        handlers::system::HealthResponse,
        crate::error::ErrorResponse,
        crate::error::ErrorBody,
    ))
)]
pub struct ApiDoc;

/// Builds the complete read-view router.
pub fn build_router(state: ViewState) -> Router {
    let router = Router::new()
        .merge(handlers::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
}
