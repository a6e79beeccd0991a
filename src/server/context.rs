//! What a method or tool handler gets to work with

use crate::config::VibesConfig;
use crate::error::VibeResult;
use crate::protocol::{ErrorCode, RequestId, ResponseEnvelope};
use crate::session::{Sessions, VibeSesh};
use crate::tools::ToolRegistry;

/// Handler context for one dispatch.
///
/// Holds the session as loaded at the start of the tick (with the dispatched
/// slot already cleared) plus the collaborators a handler may need. Handlers
/// answer by queueing an event through [`VibeContext::respond`] and friends.
pub struct VibeContext<'a> {
    pub sessions: &'a Sessions,
    pub tools: &'a ToolRegistry,
    pub config: &'a VibesConfig,
    pub sesh: VibeSesh,
}

impl<'a> VibeContext<'a> {
    pub fn new(
        sessions: &'a Sessions,
        tools: &'a ToolRegistry,
        config: &'a VibesConfig,
        sesh: VibeSesh,
    ) -> Self {
        Self {
            sessions,
            tools,
            config,
            sesh,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.sesh.session_id
    }

    pub async fn respond(&mut self, envelope: ResponseEnvelope) -> VibeResult<()> {
        self.sessions.respond(&mut self.sesh, envelope).await
    }

    pub async fn acknowledge(&mut self, request_id: Option<RequestId>) -> VibeResult<()> {
        self.sessions.acknowledge(&mut self.sesh, request_id).await
    }

    pub async fn reject(
        &mut self,
        request_id: Option<RequestId>,
        code: ErrorCode,
        message: impl Into<String>,
    ) -> VibeResult<()> {
        self.sessions
            .reject(&mut self.sesh, request_id, code, message)
            .await
    }

    /// Persist a change to the session (re-reading the stored copy first)
    pub async fn update<F>(&mut self, f: F) -> VibeResult<()>
    where
        F: FnOnce(&mut VibeSesh),
    {
        self.sessions.mutate(&mut self.sesh, f).await
    }
}
