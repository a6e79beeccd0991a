//! Agent sessions
//!
//! A session is a set of single-slot mailboxes, one per kind of pending
//! work: an outbound event, a method invocation and a tool invocation.
//! Sessions live in a [`SessionStore`] and are always written back whole;
//! the inbound request path and the stream loop only meet through it.

mod manager;
pub mod store;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::VibeResult;
use crate::protocol::{Occasion, Params, RequestId, ResponseEnvelope};

pub use manager::{Sessions, SESSION_KEY_PREFIX};
pub use store::{MemoryStore, SessionStore};

/// Identity bound to a session when authentication is required
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: String,
    /// Type discriminator (e.g. "user", "admin")
    pub kind: String,
}

impl AuthenticatedUser {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
        }
    }
}

/// Body of an outbound event: sent verbatim if text, JSON-encoded otherwise.
/// Stored tagged so a JSON string stays JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum EventPayload {
    Text(String),
    Json(Value),
}

impl EventPayload {
    /// Render as the text that goes into `data:` lines
    pub fn to_data(&self) -> VibeResult<String> {
        match self {
            EventPayload::Text(text) => Ok(text.clone()),
            EventPayload::Json(value) => Ok(serde_json::to_string(value)?),
        }
    }
}

impl From<Value> for EventPayload {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => EventPayload::Text(s),
            other => EventPayload::Json(other),
        }
    }
}

/// An event waiting to be written to the session's stream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionEvent {
    pub session_id: String,
    pub occasion: Occasion,
    pub payload: EventPayload,
}

impl SessionEvent {
    pub fn new(session_id: impl Into<String>, occasion: Occasion, payload: EventPayload) -> Self {
        Self {
            session_id: session_id.into(),
            occasion,
            payload,
        }
    }

    /// The first event of every stream: where to POST messages
    pub fn endpoint(session_id: impl Into<String>, uri: impl Into<String>) -> Self {
        Self::new(session_id, Occasion::Endpoint, EventPayload::Text(uri.into()))
    }

    /// Wrap a JSON-RPC envelope; error envelopes go out under `error`
    pub fn envelope(session_id: impl Into<String>, envelope: ResponseEnvelope) -> Self {
        let occasion = if envelope.is_error() {
            Occasion::Error
        } else {
            Occasion::Message
        };
        Self::new(session_id, occasion, EventPayload::Json(envelope.into_value()))
    }
}

/// A method call accepted by the router, waiting for the loop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MethodInvocationRequest {
    pub session_id: String,
    pub request_id: Option<RequestId>,
    pub method: String,
    pub request_body: Option<Params>,
}

/// A tool call accepted by `tools/call`, waiting for the loop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolInvocationRequest {
    pub session_id: String,
    pub request_id: Option<RequestId>,
    /// Registered tool name
    pub tool: String,
    pub request_body: Option<Params>,
}

/// Session state as stored in the cache
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VibeSesh {
    pub session_id: String,
    #[serde(default)]
    pub pending_event: Option<SessionEvent>,
    #[serde(default)]
    pub pending_method: Option<MethodInvocationRequest>,
    #[serde(default)]
    pub pending_tool: Option<ToolInvocationRequest>,
    #[serde(default)]
    pub user: Option<AuthenticatedUser>,
}

impl VibeSesh {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            pending_event: None,
            pending_method: None,
            pending_tool: None,
            user: None,
        }
    }

    /// Put an event in the outbound slot, returning whatever it replaced
    pub fn add_session_event(&mut self, event: SessionEvent) -> Option<SessionEvent> {
        self.pending_event.replace(event)
    }

    pub fn take_pending_event(&mut self) -> Option<SessionEvent> {
        self.pending_event.take()
    }

    pub fn add_method_invocation(
        &mut self,
        request: MethodInvocationRequest,
    ) -> Option<MethodInvocationRequest> {
        self.pending_method.replace(request)
    }

    pub fn take_pending_method(&mut self) -> Option<MethodInvocationRequest> {
        self.pending_method.take()
    }

    pub fn add_tool_invocation(
        &mut self,
        request: ToolInvocationRequest,
    ) -> Option<ToolInvocationRequest> {
        self.pending_tool.replace(request)
    }

    pub fn take_pending_tool(&mut self) -> Option<ToolInvocationRequest> {
        self.pending_tool.take()
    }

    pub fn set_user(&mut self, user: AuthenticatedUser) {
        self.user = Some(user);
    }
}
