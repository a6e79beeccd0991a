//! MCP over Server-Sent Events
//!
//! ## Endpoints
//! - `GET /mcp/sse` - open a session; the response body is its event stream
//! - `POST /mcp/sse/messages?session_id=...` - JSON-RPC requests from the agent
//! - `GET /mcp/info` - server info and capabilities
//!
//! Responses to POSTed requests never come back on the POST itself; they
//! arrive as frames on the session's stream.

pub mod auth;
pub mod handler;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::VibesConfig;
use crate::error::VibeResult;
use crate::methods::MethodRegistry;
use crate::server::{ProcessAgentRequest, VibeStreamLoop};
use crate::session::Sessions;
use crate::tools::ToolRegistry;

pub use auth::TokenStore;

/// Shared state for the MCP endpoints
pub struct AppState {
    pub config: Arc<VibesConfig>,
    pub sessions: Sessions,
    pub methods: Arc<MethodRegistry>,
    pub tools: Arc<ToolRegistry>,
    pub tokens: TokenStore,
    pub router: ProcessAgentRequest,
    pub stream_loop: VibeStreamLoop,
    /// Cancelled when the server stops; ends every open stream
    pub shutdown: CancellationToken,
}

impl AppState {
    /// State with an in-process session cache
    pub fn from_config(config: VibesConfig) -> VibeResult<Self> {
        let sessions = Sessions::in_memory(config.service.session_ttl());
        Self::with_sessions(config, sessions)
    }

    /// State over an existing session repository
    pub fn with_sessions(config: VibesConfig, sessions: Sessions) -> VibeResult<Self> {
        let methods = Arc::new(MethodRegistry::from_config(&config)?);
        let tools = Arc::new(ToolRegistry::from_config(&config)?);
        let tokens = TokenStore::from_config(&config.auth);
        let config = Arc::new(config);
        let shutdown = CancellationToken::new();

        Ok(Self {
            router: ProcessAgentRequest::new(sessions.clone(), methods.clone()),
            stream_loop: VibeStreamLoop::new(
                sessions.clone(),
                methods.clone(),
                tools.clone(),
                config.clone(),
            )
            .with_shutdown(shutdown.clone()),
            config,
            sessions,
            methods,
            tools,
            tokens,
            shutdown,
        })
    }

    /// Close every open stream so graceful shutdown can finish
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}
