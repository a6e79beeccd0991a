//! SSE frame transport
//!
//! Formats Server-Sent Event frames and pushes them into a [`FrameSink`].
//! In the server the sink is the channel that feeds the streaming response
//! body, so a frame is on its way to the client as soon as it is sent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::ServiceConfig;
use crate::error::VibeResult;
use crate::protocol::{Occasion, JSONRPC_VERSION};
use crate::session::EventPayload;
use crate::utils::current_timestamp;

/// Where formatted frames go
pub trait FrameSink: Send + Sync {
    /// Push one frame; false when the client is gone
    fn push(&self, frame: String) -> bool;

    /// Whether the client side is still attached
    fn is_open(&self) -> bool;
}

/// Sink feeding an HTTP response body through an unbounded channel
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSink {
    /// Create a sink and the receiving end the response body streams from
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl FrameSink for ChannelSink {
    fn push(&self, frame: String) -> bool {
        self.tx.send(frame).is_ok()
    }

    fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }
}

/// Sink that keeps every frame in memory
#[derive(Clone, Default)]
pub struct RecordingSink {
    frames: Arc<Mutex<Vec<String>>>,
    attempts: Arc<Mutex<Vec<String>>>,
    closed: Arc<AtomicBool>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames delivered so far
    pub fn frames(&self) -> Vec<String> {
        self.frames.lock().clone()
    }

    /// Every push, including the ones refused after a disconnect
    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().clone()
    }

    /// Simulate the client going away
    pub fn disconnect(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

impl FrameSink for RecordingSink {
    fn push(&self, frame: String) -> bool {
        self.attempts.lock().push(frame.clone());
        if self.closed.load(Ordering::SeqCst) {
            return false;
        }
        self.frames.lock().push(frame);
        true
    }

    fn is_open(&self) -> bool {
        !self.closed.load(Ordering::SeqCst)
    }
}

/// Render one SSE frame. Each payload line gets its own `data:` field.
pub fn format_frame(data: &str, event: Option<&str>, id: Option<&str>) -> String {
    let mut frame = String::new();

    if let Some(id) = id {
        frame.push_str("id: ");
        frame.push_str(id);
        frame.push('\n');
    }

    if let Some(event) = event {
        frame.push_str("event: ");
        frame.push_str(event);
        frame.push('\n');
    }

    for line in data.split('\n') {
        frame.push_str("data: ");
        frame.push_str(line);
        frame.push('\n');
    }

    frame.push('\n');
    frame
}

/// Per-stream transport: framing, heartbeats and the close notice
pub struct VibeTransporter {
    session_id: String,
    sink: Box<dyn FrameSink>,
    heartbeat_interval: Duration,
    poll_interval: Duration,
    last_heartbeat: Instant,
    ready: bool,
    closed: AtomicBool,
}

impl VibeTransporter {
    pub fn new(
        session_id: impl Into<String>,
        sink: Box<dyn FrameSink>,
        heartbeat_interval: Duration,
        poll_interval: Duration,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            sink,
            heartbeat_interval,
            poll_interval,
            last_heartbeat: Instant::now(),
            ready: false,
            closed: AtomicBool::new(false),
        }
    }

    /// Transport with intervals taken from the service config
    pub fn from_config(
        session_id: impl Into<String>,
        sink: Box<dyn FrameSink>,
        service: &ServiceConfig,
    ) -> Self {
        Self::new(
            session_id,
            sink,
            service.heartbeat_interval(),
            service.poll_interval(),
        )
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Mark the stream ready. The close notice is armed from here on.
    pub fn open(&mut self) {
        info!(session_id = %self.session_id, "VibeTransporter - starting");
        self.ready = true;
    }

    /// Whether the client is still attached
    pub fn is_live(&self) -> bool {
        self.sink.is_open()
    }

    /// Send one frame. Returns false if the client has gone away.
    pub fn send(
        &self,
        payload: &EventPayload,
        event: Option<Occasion>,
        id: Option<&str>,
    ) -> VibeResult<bool> {
        let data = payload.to_data()?;
        let frame = format_frame(&data, event.as_ref().map(Occasion::as_str), id);
        Ok(self.sink.push(frame))
    }

    /// Emit a heartbeat if the interval has elapsed, then sleep one poll interval
    pub async fn heartbeat(&mut self) -> VibeResult<()> {
        let now = Instant::now();
        if now.duration_since(self.last_heartbeat) >= self.heartbeat_interval {
            debug!(session_id = %self.session_id, "Heartbeat interval has expired. Bah-dump");
            let payload = json!({
                "jsonrpc": JSONRPC_VERSION,
                "id": null,
                "result": { "timestamp": current_timestamp() }
            });
            self.send(&payload.into(), Some(Occasion::Heartbeat), None)?;
            self.last_heartbeat = now;
        }

        tokio::time::sleep(self.poll_interval).await;
        Ok(())
    }

    /// Send the close notice. Only the first call on an opened transport sends anything.
    pub fn close(&self) {
        if !self.ready || self.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        let payload = json!({
            "jsonrpc": JSONRPC_VERSION,
            "id": null,
            "method": "message",
            "result": {
                "type": "close",
                "id": self.session_id,
                "timestamp": current_timestamp(),
            }
        });
        // Serializing a json! value cannot fail; a gone client is fine here.
        let _ = self.send(&payload.into(), Some(Occasion::Close), None);
        info!(session_id = %self.session_id, "VibeTransporter - closed");
    }
}

impl Drop for VibeTransporter {
    fn drop(&mut self) {
        self.close();
    }
}
