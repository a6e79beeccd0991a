//! Inbound request router
//!
//! Takes a validated [`AgentVibe`] off the messages endpoint and parks it in
//! the session's method slot. Nothing is executed here; the stream loop picks
//! the request up on its next tick.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::VibeResult;
use crate::methods::MethodRegistry;
use crate::protocol::{AgentVibe, ErrorCode};
use crate::session::{MethodInvocationRequest, Sessions};

/// Routes agent requests into their session
#[derive(Clone)]
pub struct ProcessAgentRequest {
    sessions: Sessions,
    methods: Arc<MethodRegistry>,
}

impl ProcessAgentRequest {
    pub fn new(sessions: Sessions, methods: Arc<MethodRegistry>) -> Self {
        Self { sessions, methods }
    }

    /// Route one request.
    ///
    /// Fails with `SessionNotFound` when the session has expired or never
    /// existed. Unknown methods are answered with a `METHOD_NOT_FOUND` frame.
    pub async fn handle(&self, vibe: AgentVibe) -> VibeResult<()> {
        let mut sesh = self.sessions.require(&vibe.session_id).await?;

        if !self.methods.contains(&vibe.method) {
            warn!(session_id = %vibe.session_id, method = %vibe.method, "Method not invocable");
            let message = format!("Method '{}' not found", vibe.method);
            return self
                .sessions
                .reject(&mut sesh, vibe.id, ErrorCode::MethodNotFound, message)
                .await;
        }

        debug!(session_id = %vibe.session_id, method = %vibe.method, "Queueing method");
        let request = MethodInvocationRequest {
            session_id: vibe.session_id,
            request_id: vibe.id,
            method: vibe.method,
            request_body: vibe.params,
        };
        if let Some(dropped) = sesh.add_method_invocation(request) {
            warn!(
                session_id = %sesh.session_id,
                method = %dropped.method,
                "Overwrote a method invocation that was never dispatched"
            );
        }
        self.sessions.save(&sesh).await
    }
}
