//! Per-stream event loop
//!
//! One loop runs for every open SSE stream. Each tick reloads the session
//! from the store and does at most one thing, in priority order:
//!
//! 1. write the pending event to the stream
//! 2. dispatch the pending method invocation
//! 3. dispatch the pending tool invocation
//!
//! then beats the heart (which also paces the loop) and checks whether the
//! client is still there. Server shutdown cuts the pacing sleep short and
//! ends the loop, so every stream gets its close frame and its body ends.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::context::VibeContext;
use super::transport::VibeTransporter;
use crate::config::VibesConfig;
use crate::error::VibeResult;
use crate::methods::MethodRegistry;
use crate::protocol::{ErrorCode, Occasion, RequestId};
use crate::session::Sessions;
use crate::tools::ToolRegistry;

/// What a single tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// Nothing pending (or the session is gone)
    Idle,
    EventSent(Occasion),
    MethodInvoked(String),
    ToolInvoked(String),
}

/// Drives one session's stream
#[derive(Clone)]
pub struct VibeStreamLoop {
    sessions: Sessions,
    methods: Arc<MethodRegistry>,
    tools: Arc<ToolRegistry>,
    config: Arc<VibesConfig>,
    shutdown: CancellationToken,
}

impl VibeStreamLoop {
    pub fn new(
        sessions: Sessions,
        methods: Arc<MethodRegistry>,
        tools: Arc<ToolRegistry>,
        config: Arc<VibesConfig>,
    ) -> Self {
        Self {
            sessions,
            methods,
            tools,
            config,
            shutdown: CancellationToken::new(),
        }
    }

    /// End every running loop when `shutdown` is cancelled
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Run the loop until the client disconnects, the server shuts down or
    /// a handler fails.
    ///
    /// The close frame goes out however this ends, including when the
    /// future is dropped.
    pub async fn start(&self, session_id: String, mut transport: VibeTransporter) -> VibeResult<()> {
        transport.open();
        let result = self.run(&session_id, &mut transport).await;
        if let Err(e) = &result {
            error!(session_id = %session_id, error = %e, "Stream loop failed");
        }
        transport.close();
        result
    }

    async fn run(&self, session_id: &str, transport: &mut VibeTransporter) -> VibeResult<()> {
        loop {
            self.tick(session_id, transport).await?;

            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    info!(session_id = %session_id, "Server shutting down, closing stream");
                    return Ok(());
                }
                beat = transport.heartbeat() => beat?,
            }

            if !transport.is_live() {
                info!(session_id = %session_id, "Agent disconnected");
                return Ok(());
            }
        }
    }

    /// One pass over the session's slots
    pub async fn tick(&self, session_id: &str, transport: &VibeTransporter) -> VibeResult<Tick> {
        let Some(mut sesh) = self.sessions.load(session_id).await? else {
            return Ok(Tick::Idle);
        };

        if let Some(event) = sesh.take_pending_event() {
            debug!(session_id = %session_id, occasion = %event.occasion, "Sending event");
            transport.send(&event.payload, Some(event.occasion), None)?;
            self.sessions.save(&sesh).await?;
            return Ok(Tick::EventSent(event.occasion));
        }

        if let Some(request) = sesh.take_pending_method() {
            self.sessions.save(&sesh).await?;
            let name = request.method;
            let request_id = request.request_id;
            let mut cx = VibeContext::new(&self.sessions, &self.tools, &self.config, sesh);

            match self.methods.get(&name) {
                Some(method) => {
                    debug!(session_id = %session_id, method = %name, "Dispatching method");
                    let outcome = method
                        .handle(&mut cx, request_id.clone(), request.request_body)
                        .await;
                    self.settle(&mut cx, &name, request_id, outcome).await?;
                }
                None => {
                    warn!(session_id = %session_id, method = %name, "No handler for parked method");
                    let message = format!("Method '{}' not found", name);
                    cx.reject(request_id, ErrorCode::MethodNotFound, message).await?;
                }
            }
            return Ok(Tick::MethodInvoked(name));
        }

        if let Some(request) = sesh.take_pending_tool() {
            self.sessions.save(&sesh).await?;
            let name = request.tool;
            let request_id = request.request_id;
            let mut cx = VibeContext::new(&self.sessions, &self.tools, &self.config, sesh);

            match self.tools.get(&name) {
                Some(tool) => {
                    debug!(session_id = %session_id, tool = %name, "Executing tool");
                    let outcome = tool
                        .execute(&mut cx, request_id.clone(), request.request_body)
                        .await;
                    self.settle(&mut cx, &name, request_id, outcome).await?;
                }
                None => {
                    warn!(session_id = %session_id, tool = %name, "No tool for parked invocation");
                    let message = format!("Tool not found: {}", name);
                    cx.reject(request_id, ErrorCode::ToolNotFound, message).await?;
                }
            }
            return Ok(Tick::ToolInvoked(name));
        }

        Ok(Tick::Idle)
    }

    /// Apply the catch-exceptions policy to a handler's result
    async fn settle(
        &self,
        cx: &mut VibeContext<'_>,
        name: &str,
        request_id: Option<RequestId>,
        outcome: VibeResult<()>,
    ) -> VibeResult<()> {
        let Err(e) = outcome else {
            return Ok(());
        };

        if !self.config.service.catch_exceptions {
            return Err(e);
        }

        error!(session_id = %cx.session_id(), handler = %name, error = %e, "Handler failed");
        cx.reject(request_id, ErrorCode::Internal, e.to_string()).await
    }
}
