//! Device session protocol engine.
//!
//! A [`Session`] owns one device connection for its lifetime and runs two
//! duties against it:
//!
//! - **receive**: decode each inbound frame, record the reading, then send
//!   one ack. Undecodable frames are logged and skipped; a store failure
//!   ends the session.
//! - **send**: sample the [`CommandSource`] every poll interval and write an
//!   LED frame whenever it yields a command.
//!
//! The duties are raced; whichever finishes first (device gone, transport
//! error, store failure or shutdown) ends the session and the other is
//! dropped on the spot, so no duty outlives its session.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::Message;
use futures_util::{Sink, Stream, StreamExt};
use tokio::sync::watch;

use super::messages::{OutboundFrame, SensorFrame};
use super::writer::FrameWriter;
use crate::command::CommandSource;
use crate::domain::SessionId;
use crate::error::SessionError;
use crate::persistence::ReadingStore;

/// One device connection's protocol engine.
pub struct Session<S, C> {
    id: SessionId,
    store: Arc<S>,
    source: C,
    poll_interval: Duration,
}

impl<S, C> Session<S, C>
where
    S: ReadingStore,
    C: CommandSource,
{
    /// Creates a session that records into `store` and sends the commands
    /// produced by `source`, sampling it every `poll_interval`.
    pub const fn new(id: SessionId, store: Arc<S>, source: C, poll_interval: Duration) -> Self {
        Self {
            id,
            store,
            source,
            poll_interval,
        }
    }

    /// Runs both duties until the session ends.
    ///
    /// Returns `Ok(())` when the device closed the connection or `shutdown`
    /// flipped to `true`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ConnectionClosed`] if a write hits a dead
    /// transport, [`SessionError::Transport`] on a read error and
    /// [`SessionError::Store`] if recording a reading fails.
    pub async fn run<Tx, Rx, E>(
        self,
        outbound: Tx,
        inbound: Rx,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), SessionError>
    where
        Tx: Sink<Message> + Unpin,
        Tx::Error: fmt::Display,
        Rx: Stream<Item = Result<Message, E>> + Unpin,
        E: fmt::Display,
    {
        let Self {
            id,
            store,
            source,
            poll_interval,
        } = self;
        let writer = FrameWriter::new(outbound);
        tracing::debug!(session_id = %id, "session running");

        tokio::select! {
            result = receive_duty(id, store.as_ref(), inbound, &writer) => result,
            result = send_duty(id, source, &writer, poll_interval) => result,
            () = shutdown_requested(&mut shutdown) => {
                tracing::info!(session_id = %id, "session closed by shutdown");
                Ok(())
            }
        }
    }
}

impl<S, C> fmt::Debug for Session<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

async fn receive_duty<S, Rx, E, Tx>(
    id: SessionId,
    store: &S,
    mut inbound: Rx,
    writer: &FrameWriter<Tx>,
) -> Result<(), SessionError>
where
    S: ReadingStore,
    Rx: Stream<Item = Result<Message, E>> + Unpin,
    E: fmt::Display,
    Tx: Sink<Message> + Unpin,
    Tx::Error: fmt::Display,
{
    while let Some(message) = inbound.next().await {
        let decoded = match message {
            Ok(Message::Text(text)) => SensorFrame::decode(text.as_str().as_bytes()),
            Ok(Message::Binary(data)) => SensorFrame::decode(&data),
            Ok(Message::Ping(_) | Message::Pong(_)) => continue,
            Ok(Message::Close(_)) => break,
            Err(e) => return Err(SessionError::Transport(e.to_string())),
        };
        let frame = match decoded {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(session_id = %id, error = %e, "invalid frame received, skipping");
                continue;
            }
        };

        let reading = frame.into_reading();
        if reading.is_empty() {
            tracing::debug!(session_id = %id, "report carries no measurements");
        }
        let row = store.record(reading).await?;
        tracing::debug!(
            session_id = %id,
            row_id = row.id,
            tds = ?row.tdsvalue,
            turbidity = ?row.turbidityvalue,
            ph = ?row.phvalue,
            "reading stored"
        );
        writer.send(&OutboundFrame::ack()).await?;
    }
    Ok(())
}

async fn send_duty<C, Tx>(
    id: SessionId,
    mut source: C,
    writer: &FrameWriter<Tx>,
    poll_interval: Duration,
) -> Result<(), SessionError>
where
    C: CommandSource,
    Tx: Sink<Message> + Unpin,
    Tx::Error: fmt::Display,
{
    loop {
        if let Some(command) = source.poll() {
            tracing::info!(session_id = %id, %command, "sending command");
            writer.send(&OutboundFrame::command(command)).await?;
        }
        tokio::time::sleep(poll_interval).await;
    }
}

/// Resolves once `shutdown` holds `true`; never resolves if the sender is
/// gone.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    let requested = shutdown.wait_for(|closing| *closing).await.is_ok();
    if !requested {
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::mpsc;
    use tokio::task::JoinHandle;
    use tokio::time::timeout;

    use super::*;
    use crate::command::{OperatorPanel, RateLimitedCommandSource};
    use crate::domain::{Command, Reading, TimeRange};
    use crate::error::StoreError;
    use crate::persistence::{InMemoryReadingStore, StoredReading};

    const WAIT: Duration = Duration::from_secs(2);

    /// Source that never produces a command.
    struct Silent;

    impl CommandSource for Silent {
        fn poll(&mut self) -> Option<Command> {
            None
        }
    }

    /// Store whose every write fails.
    #[derive(Debug, Default)]
    struct BrokenStore {
        calls: AtomicUsize,
    }

    impl ReadingStore for BrokenStore {
        async fn record(&self, _reading: Reading) -> Result<StoredReading, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::ConnectTimeout(0))
        }

        async fn query(&self, _range: Option<TimeRange>) -> Result<Vec<StoredReading>, StoreError> {
            Ok(Vec::new())
        }
    }

    struct Harness {
        device_tx: Option<mpsc::UnboundedSender<Message>>,
        device_rx: mpsc::UnboundedReceiver<Message>,
        shutdown: watch::Sender<bool>,
        handle: JoinHandle<Result<(), SessionError>>,
    }

    impl Harness {
        fn send(&self, text: &str) {
            if let Some(tx) = &self.device_tx {
                let _ = tx.send(Message::text(text.to_string()));
            }
        }

        fn hang_up(&mut self) {
            self.device_tx = None;
        }

        async fn next_json(&mut self) -> serde_json::Value {
            let Ok(Some(Message::Text(text))) = timeout(WAIT, self.device_rx.recv()).await else {
                panic!("expected a text frame");
            };
            serde_json::from_str(text.as_str()).unwrap_or_default()
        }

        async fn finish(self) -> (Result<(), SessionError>, mpsc::UnboundedReceiver<Message>) {
            let Ok(Ok(result)) = timeout(WAIT, self.handle).await else {
                panic!("session did not terminate");
            };
            (result, self.device_rx)
        }
    }

    fn spawn_session<S, C>(store: Arc<S>, source: C, poll_interval: Duration) -> Harness
    where
        S: ReadingStore,
        C: CommandSource + 'static,
    {
        let (device_tx, server_rx) = mpsc::unbounded_channel::<Message>();
        let (server_tx, device_rx) = mpsc::unbounded_channel::<Message>();

        let inbound = Box::pin(futures_util::stream::unfold(server_rx, |mut rx| async move {
            rx.recv().await.map(|msg| (Ok::<_, axum::Error>(msg), rx))
        }));
        let outbound = Box::pin(futures_util::sink::unfold(
            server_tx,
            |tx, msg: Message| async move {
                tx.send(msg).map_err(axum::Error::new)?;
                Ok::<_, axum::Error>(tx)
            },
        ));
        let (shutdown, shutdown_rx) = watch::channel(false);

        let session = Session::new(SessionId::new(), store, source, poll_interval);
        let handle = tokio::spawn(session.run(outbound, inbound, shutdown_rx));

        Harness {
            device_tx: Some(device_tx),
            device_rx,
            shutdown,
            handle,
        }
    }

    fn ack() -> serde_json::Value {
        serde_json::json!({"status": "Message Received"})
    }

    #[tokio::test]
    async fn full_report_is_recorded_then_acked_once() {
        let store = Arc::new(InMemoryReadingStore::new());
        let mut h = spawn_session(Arc::clone(&store), Silent, Duration::from_millis(100));

        h.send(r#"{"tdsvalue": 120, "turbidityvalue": 3, "phvalue": 7.1}"#);
        assert_eq!(h.next_json().await, ack());

        let rows = store.query(None).await.unwrap_or_default();
        let Some(row) = rows.first() else {
            panic!("expected a stored row");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(row.tdsvalue, Some(120.0));
        assert_eq!(row.turbidityvalue, Some(3.0));
        assert_eq!(row.phvalue, Some(7.1));

        h.hang_up();
        let (result, mut rest) = h.finish().await;
        assert!(result.is_ok());
        assert!(rest.recv().await.is_none(), "no frame after the single ack");
    }

    #[tokio::test]
    async fn partial_report_is_stored_with_nulls_and_acked() {
        let store = Arc::new(InMemoryReadingStore::new());
        let mut h = spawn_session(Arc::clone(&store), Silent, Duration::from_millis(100));

        h.send(r#"{"phvalue": 7.1}"#);
        assert_eq!(h.next_json().await, ack());

        let rows = store.query(None).await.unwrap_or_default();
        let Some(row) = rows.first() else {
            panic!("expected a stored row");
        };
        assert_eq!(
            (row.tdsvalue, row.turbidityvalue, row.phvalue),
            (None, None, Some(7.1))
        );
    }

    #[tokio::test]
    async fn malformed_frames_are_skipped_without_ack() {
        let store = Arc::new(InMemoryReadingStore::new());
        let mut h = spawn_session(Arc::clone(&store), Silent, Duration::from_millis(100));

        h.send("{not json");
        h.send("[120, 3, 7.1]");
        h.send(r#"{"phvalue": "seven"}"#);
        h.send(r#"{"tdsvalue": 1}"#);
        assert_eq!(h.next_json().await, ack());

        h.hang_up();
        let (result, mut rest) = h.finish().await;
        assert!(result.is_ok());
        assert!(rest.recv().await.is_none());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn acks_follow_inbound_order() {
        let store = Arc::new(InMemoryReadingStore::new());
        let mut h = spawn_session(Arc::clone(&store), Silent, Duration::from_millis(100));

        for tds in 1..=3 {
            h.send(&format!(r#"{{"tdsvalue": {tds}}}"#));
        }
        for _ in 1..=3 {
            assert_eq!(h.next_json().await, ack());
        }
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn binary_payload_is_accepted() {
        let store = Arc::new(InMemoryReadingStore::new());
        let mut h = spawn_session(Arc::clone(&store), Silent, Duration::from_millis(100));

        if let Some(tx) = &h.device_tx {
            let _ = tx.send(Message::binary(br#"{"turbidityvalue": 4.5}"#.to_vec()));
        }
        assert_eq!(h.next_json().await, ack());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn close_frame_ends_session_cleanly() {
        let store = Arc::new(InMemoryReadingStore::new());
        let h = spawn_session(store, Silent, Duration::from_millis(100));

        if let Some(tx) = &h.device_tx {
            let _ = tx.send(Message::Close(None));
        }
        let (result, _) = h.finish().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn store_failure_terminates_session_without_ack() {
        let store = Arc::new(BrokenStore::default());
        let h = spawn_session(Arc::clone(&store), Silent, Duration::from_millis(100));

        h.send(r#"{"tdsvalue": 1}"#);
        h.send(r#"{"tdsvalue": 2}"#);
        let (result, mut rest) = h.finish().await;

        let Err(SessionError::Store(_)) = result else {
            panic!("expected store error");
        };
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
        assert!(rest.recv().await.is_none(), "no ack after a failed store");
    }

    #[tokio::test]
    async fn hang_up_stops_command_duty() {
        let panel = Arc::new(OperatorPanel::new());
        panel.hold(Command::On);
        let source = RateLimitedCommandSource::new(Arc::clone(&panel), Duration::from_millis(20));
        let store = Arc::new(InMemoryReadingStore::new());
        let mut h = spawn_session(Arc::clone(&store), source, Duration::from_millis(10));

        assert_eq!(h.next_json().await, serde_json::json!({"led": 1}));
        h.hang_up();
        let (result, mut rest) = h.finish().await;
        assert!(result.is_ok());

        // Drain whatever was written before the hang-up; the channel must
        // then close because the send duty is gone.
        let drained = timeout(WAIT, async {
            while rest.recv().await.is_some() {}
        })
        .await;
        assert!(drained.is_ok());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn dead_transport_ends_session() {
        let panel = Arc::new(OperatorPanel::new());
        panel.hold(Command::Off);
        let source = RateLimitedCommandSource::new(Arc::clone(&panel), Duration::from_millis(20));
        let store = Arc::new(InMemoryReadingStore::new());
        let Harness {
            device_tx,
            device_rx,
            shutdown: _shutdown,
            handle,
        } = spawn_session(store, source, Duration::from_millis(10));
        drop(device_rx);

        let Ok(Ok(result)) = timeout(WAIT, handle).await else {
            panic!("session did not terminate");
        };
        let Err(SessionError::ConnectionClosed) = result else {
            panic!("expected connection closed");
        };
        drop(device_tx);
    }

    #[tokio::test]
    async fn shutdown_signal_ends_session() {
        let store = Arc::new(InMemoryReadingStore::new());
        let h = spawn_session(store, Silent, Duration::from_millis(100));

        let _ = h.shutdown.send(true);
        let (result, _) = h.finish().await;
        assert!(result.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn held_on_sends_one_frame_per_cooldown() {
        let panel = Arc::new(OperatorPanel::new());
        panel.hold(Command::On);
        let source = RateLimitedCommandSource::new(Arc::clone(&panel), Duration::from_millis(200));
        let store = Arc::new(InMemoryReadingStore::new());
        let mut h = spawn_session(store, source, Duration::from_millis(100));

        tokio::time::sleep(Duration::from_millis(1050)).await;

        let mut frames = Vec::new();
        while let Ok(msg) = h.device_rx.try_recv() {
            frames.push(msg);
        }
        // 11 poll ticks elapsed; a 200 ms cooldown admits one frame in two.
        assert!((5..=6).contains(&frames.len()), "got {} frames", frames.len());
        for msg in frames {
            let Message::Text(text) = msg else {
                panic!("expected text frame");
            };
            let json: serde_json::Value = serde_json::from_str(text.as_str()).unwrap_or_default();
            assert_eq!(json, serde_json::json!({"led": 1}));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn expired_press_is_never_sent() {
        let panel = Arc::new(OperatorPanel::with_press_window(Duration::from_millis(250)));
        panel.press(Command::On);
        tokio::time::sleep(Duration::from_secs(2)).await;

        let source = RateLimitedCommandSource::new(Arc::clone(&panel), Duration::from_millis(200));
        let store = Arc::new(InMemoryReadingStore::new());
        let mut h = spawn_session(store, source, Duration::from_millis(100));
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert!(h.device_rx.try_recv().is_err(), "expired press was sent");
    }

    #[tokio::test]
    async fn both_triggers_send_on() {
        let panel = Arc::new(OperatorPanel::new());
        panel.press(Command::Off);
        panel.press(Command::On);
        let source = RateLimitedCommandSource::new(Arc::clone(&panel), Duration::from_millis(200));
        let store = Arc::new(InMemoryReadingStore::new());
        let mut h = spawn_session(store, source, Duration::from_millis(10));

        assert_eq!(h.next_json().await, serde_json::json!({"led": 1}));
    }
}
