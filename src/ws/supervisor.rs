//! Session supervisor: binds the device endpoint and serves sessions.
//!
//! Every accepted connection gets its own session task. There is no
//! connection limit and no backpressure; sessions are independent of each
//! other and a failing session never affects the listener.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::handler::ws_handler;
use crate::app_state::AppState;

/// Builds the device router: WebSocket upgrades on `/` and `/ws`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ws_handler))
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves device sessions on `listener` until `shutdown` resolves, then
/// asks every live session to close.
///
/// # Errors
///
/// Returns an I/O error if the server fails.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let sessions = Arc::clone(&state.sessions);
    let app = build_router(state);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown.await;
        let live = sessions.len().await;
        tracing::info!(live, "closing device sessions");
        sessions.close_all();
    })
    .await
}
