//! Vibes MCP Server
//!
//! A Model Context Protocol server that talks to agents over Server-Sent
//! Events. Each agent gets a long-lived stream; its JSON-RPC requests are
//! POSTed separately and answered as frames on that stream.
//!
//! # How a request flows
//!
//! 1. `GET /mcp/sse` creates a session, queues the `endpoint` event and
//!    starts a [`VibeStreamLoop`] for it.
//! 2. `POST /mcp/sse/messages?session_id=...` goes through
//!    [`ProcessAgentRequest`], which parks the call in the session's method
//!    slot and answers `202`.
//! 3. The loop notices the parked call on its next tick, runs the handler,
//!    and the handler queues a response event that the following tick writes
//!    to the stream.
//!
//! Sessions are whole values in a TTL cache ([`session::SessionStore`]);
//! each slot holds at most one item and the last write wins.
//!
//! # Modules
//!
//! - `protocol`: JSON-RPC envelopes, MCP types and response builders
//! - `session`: sessions, their mailboxes and the backing store
//! - `methods`: MCP method handlers and their registry
//! - `tools`: MCP tools and their registry
//! - `server`: request router, stream loop and SSE transport
//! - `api`: axum routes
//! - `config`: TOML + environment configuration
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vibes_mcp::api::{create_router, AppState};
//! use vibes_mcp::config::VibesConfig;
//!
//! #[tokio::main]
//! async fn main() -> vibes_mcp::error::VibeResult<()> {
//!     let state = Arc::new(AppState::from_config(VibesConfig::default())?);
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3030").await?;
//!     axum::serve(listener, create_router(state)).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod methods;
pub mod protocol;
pub mod server;
pub mod session;
pub mod tools;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::VibesConfig;
pub use error::{VibeError, VibeResult};
pub use methods::{AgentMethod, MethodRegistry};
pub use protocol::{AgentVibe, ErrorCode, McpTool, RequestId, ResponseEnvelope, ServerInfo};
pub use server::{ProcessAgentRequest, VibeStreamLoop, VibeTransporter};
pub use session::{Sessions, VibeSesh};
pub use tools::{ToolRegistry, VibeTool};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
