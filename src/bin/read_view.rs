//! Read-view server entry point.
//!
//! Serves the stored readings as an HTML page (`/`) and JSON (`/data`) on
//! `READ_VIEW_ADDR` (default `0.0.0.0:8080`). Runs independently of the
//! device server; the two only share the database.

use std::sync::Arc;

use water_quality_gateway::api;
use water_quality_gateway::app_state::ViewState;
use water_quality_gateway::config::GatewayConfig;
use water_quality_gateway::persistence::StoreBackend;
use water_quality_gateway::shutdown::shutdown_signal;
use water_quality_gateway::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = GatewayConfig::from_env()?;
    init_tracing(config.log_format);
    tracing::info!(addr = %config.read_view_addr, "starting read view");

    let store = Arc::new(StoreBackend::from_config(&config).await?);
    let app = api::build_router(ViewState::new(store));

    let listener = tokio::net::TcpListener::bind(config.read_view_addr).await?;
    tracing::info!(addr = %config.read_view_addr, "read view listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
