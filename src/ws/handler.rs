//! Axum WebSocket upgrade handler for devices.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::{WebSocket, WebSocketUpgrade};
use axum::extract::{ConnectInfo, State};
use axum::response::IntoResponse;
use chrono::Utc;
use futures_util::StreamExt;

use super::session::Session;
use crate::app_state::AppState;
use crate::command::RateLimitedCommandSource;
use crate::domain::SessionId;

/// `GET /` and `GET /ws`: Upgrade a device connection to a session.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| run_device_session(socket, peer, state))
}

/// Runs one device session to completion and unregisters it.
pub async fn run_device_session(socket: WebSocket, peer: SocketAddr, state: AppState) {
    let id = SessionId::new();
    let shutdown = state.sessions.shutdown_signal();
    state.sessions.insert(id, peer).await;
    tracing::info!(session_id = %id, %peer, "device connected");

    let config = state.session_config;
    let source = RateLimitedCommandSource::new(Arc::clone(&state.panel), config.cooldown);
    let session = Session::new(id, Arc::clone(&state.store), source, config.poll_interval);
    let (outbound, inbound) = socket.split();

    match session.run(outbound, inbound, shutdown).await {
        Ok(()) => tracing::info!(session_id = %id, %peer, "device disconnected"),
        Err(e) => tracing::warn!(session_id = %id, %peer, error = %e, "session terminated"),
    }
    if let Some(info) = state.sessions.remove(id).await {
        let open_for = Utc::now().signed_duration_since(info.opened_at);
        tracing::debug!(
            session_id = %id,
            open_secs = open_for.num_seconds(),
            "session unregistered"
        );
    }
}
