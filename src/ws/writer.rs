//! Serialized outbound frame writer shared by a session's two duties.

use std::fmt;

use axum::extract::ws::Message;
use futures_util::{Sink, SinkExt};
use tokio::sync::Mutex;

use super::messages::OutboundFrame;
use crate::error::SessionError;

/// Single owner of a session's outbound half.
///
/// Each [`send`](Self::send) holds the lock for the whole frame write, so
/// frames from the receive and send duties never interleave.
pub struct FrameWriter<Tx> {
    sink: Mutex<Tx>,
}

impl<Tx> FrameWriter<Tx>
where
    Tx: Sink<Message> + Unpin,
    Tx::Error: fmt::Display,
{
    /// Takes ownership of the outbound half.
    pub fn new(sink: Tx) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }

    /// Writes one frame.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ConnectionClosed`] if the transport rejects
    /// the write.
    pub async fn send(&self, frame: &OutboundFrame) -> Result<(), SessionError> {
        let text = frame.encode();
        let mut sink = self.sink.lock().await;
        sink.send(Message::text(text)).await.map_err(|e| {
            tracing::debug!(error = %e, "frame write failed");
            SessionError::ConnectionClosed
        })
    }
}

impl<Tx> fmt::Debug for FrameWriter<Tx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameWriter").finish_non_exhaustive()
    }
}
