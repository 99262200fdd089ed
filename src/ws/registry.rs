//! Registry of live device sessions.
//!
//! A session is present from the moment its WebSocket upgrade completes
//! until both of its duties have stopped. The registry also carries the
//! shutdown signal every session listens to.

use std::collections::HashMap;
use std::net::SocketAddr;

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, watch};

use crate::domain::SessionId;

/// Metadata about a live session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    /// Remote address of the device.
    pub peer: SocketAddr,
    /// When the session was opened.
    pub opened_at: DateTime<Utc>,
}

/// Live sessions keyed by [`SessionId`].
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, SessionInfo>>,
    shutdown: watch::Sender<bool>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            sessions: RwLock::new(HashMap::new()),
            shutdown,
        }
    }

    /// Registers a session opened by `peer`.
    pub async fn insert(&self, id: SessionId, peer: SocketAddr) {
        let info = SessionInfo {
            peer,
            opened_at: Utc::now(),
        };
        self.sessions.write().await.insert(id, info);
    }

    /// Removes a session, returning its metadata if it was registered.
    pub async fn remove(&self, id: SessionId) -> Option<SessionInfo> {
        self.sessions.write().await.remove(&id)
    }

    /// Returns the number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns `true` if no session is live.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Returns a receiver that flips to `true` when [`close_all`](Self::close_all)
    /// is called.
    #[must_use]
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }

    /// Asks every live and future session to end.
    pub fn close_all(&self) {
        self.shutdown.send_replace(true);
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
