//! water-quality-gateway device server entry point.
//!
//! Accepts probe WebSocket sessions on `LISTEN_ADDR` (default
//! `0.0.0.0:5000`) and reads operator LED commands from stdin.

use std::sync::Arc;

use water_quality_gateway::app_state::AppState;
use water_quality_gateway::command::{OperatorPanel, spawn_stdin_console};
use water_quality_gateway::config::GatewayConfig;
use water_quality_gateway::persistence::StoreBackend;
use water_quality_gateway::shutdown::shutdown_signal;
use water_quality_gateway::telemetry::init_tracing;
use water_quality_gateway::ws::supervisor;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = GatewayConfig::from_env()?;
    init_tracing(config.log_format);
    tracing::info!(addr = %config.listen_addr, "starting water-quality-gateway");

    // Build store and operator input
    let store = Arc::new(StoreBackend::from_config(&config).await?);
    let panel = Arc::new(OperatorPanel::with_press_window(config.operator_press_window()));
    if config.operator_console_enabled {
        spawn_stdin_console(Arc::clone(&panel))?;
    }

    let state = AppState::new(store, panel, config.session_config());

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "device endpoint listening");

    supervisor::serve(listener, state, shutdown_signal()).await?;

    tracing::info!("water-quality-gateway stopped");
    Ok(())
}
