//! Session repository over a [`SessionStore`]

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};
use ulid::Ulid;

use super::store::{MemoryStore, SessionStore};
use super::{AuthenticatedUser, SessionEvent, VibeSesh};
use crate::error::{VibeError, VibeResult};
use crate::protocol::{AgentAcknowledge, AgentError, ErrorCode, RequestId, ResponseEnvelope};

/// Cache key prefix for stored sessions
pub const SESSION_KEY_PREFIX: &str = "vibe_sesh-";

/// Loads and saves sessions. Cheap to clone.
#[derive(Clone)]
pub struct Sessions {
    store: Arc<dyn SessionStore>,
    ttl: Duration,
}

impl Sessions {
    pub fn new(store: Arc<dyn SessionStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Sessions backed by a fresh in-process cache
    pub fn in_memory(ttl: Duration) -> Self {
        Self::new(Arc::new(MemoryStore::new()), ttl)
    }

    /// Generate a new, time-ordered session ID
    pub fn generate_session_id() -> String {
        Ulid::new().to_string()
    }

    fn key(session_id: &str) -> String {
        format!("{}{}", SESSION_KEY_PREFIX, session_id)
    }

    /// Create a new session value (not yet saved)
    pub fn create(&self, user: Option<AuthenticatedUser>) -> VibeSesh {
        let mut sesh = VibeSesh::new(Self::generate_session_id());
        if let Some(user) = user {
            sesh.set_user(user);
        }
        sesh
    }

    /// Create, announce the message endpoint, and save a new session
    pub async fn open(
        &self,
        messages_uri: &str,
        user: Option<AuthenticatedUser>,
    ) -> VibeResult<VibeSesh> {
        let mut sesh = self.create(user);
        let uri = format!(
            "{}?session_id={}",
            messages_uri,
            urlencoding::encode(&sesh.session_id)
        );
        sesh.add_session_event(SessionEvent::endpoint(sesh.session_id.clone(), uri));
        self.save(&sesh).await?;
        info!(session_id = %sesh.session_id, "Session started with agent");
        Ok(sesh)
    }

    pub async fn load(&self, session_id: &str) -> VibeResult<Option<VibeSesh>> {
        match self.store.get(&Self::key(session_id)).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Load a session that must exist
    pub async fn require(&self, session_id: &str) -> VibeResult<VibeSesh> {
        self.load(session_id)
            .await?
            .ok_or_else(|| VibeError::SessionNotFound(session_id.to_string()))
    }

    /// Write the whole session back, refreshing its TTL
    pub async fn save(&self, sesh: &VibeSesh) -> VibeResult<()> {
        let raw = serde_json::to_string(sesh)?;
        self.store.put(&Self::key(&sesh.session_id), raw, self.ttl).await
    }

    /// Number of sessions still alive in the store
    pub async fn count(&self) -> VibeResult<usize> {
        self.store.count().await
    }

    /// Re-read the stored copy, apply `f`, save, and hand the result back.
    ///
    /// Falls back to the caller's copy if the stored one has expired.
    pub async fn mutate<F>(&self, sesh: &mut VibeSesh, f: F) -> VibeResult<()>
    where
        F: FnOnce(&mut VibeSesh),
    {
        let mut fresh = self
            .load(&sesh.session_id)
            .await?
            .unwrap_or_else(|| sesh.clone());
        f(&mut fresh);
        self.save(&fresh).await?;
        *sesh = fresh;
        Ok(())
    }

    /// Queue an envelope as the session's next outbound event
    pub async fn respond(&self, sesh: &mut VibeSesh, envelope: ResponseEnvelope) -> VibeResult<()> {
        let event = SessionEvent::envelope(sesh.session_id.clone(), envelope);
        debug!(session_id = %sesh.session_id, occasion = %event.occasion, "Queueing event");
        self.mutate(sesh, |s| {
            s.add_session_event(event);
        })
        .await
    }

    /// Queue an empty-result acknowledgement
    pub async fn acknowledge(
        &self,
        sesh: &mut VibeSesh,
        request_id: Option<RequestId>,
    ) -> VibeResult<()> {
        let envelope = AgentAcknowledge::new().add_id(request_id).supply();
        self.respond(sesh, envelope).await
    }

    /// Queue a protocol error frame
    pub async fn reject(
        &self,
        sesh: &mut VibeSesh,
        request_id: Option<RequestId>,
        code: ErrorCode,
        message: impl Into<String>,
    ) -> VibeResult<()> {
        let envelope = AgentError::new().add_id(request_id).supply(code, message);
        self.respond(sesh, envelope).await
    }
}
