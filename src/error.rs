//! Error types for the Vibes MCP server

use thiserror::Error;

/// Errors raised by the session store, router, event loop and handlers.
#[derive(Debug, Error)]
pub enum VibeError {
    /// No session stored under the given id (expired or never opened).
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// Failed to (de)serialize a session or payload.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A method or tool handler failed while running in the event loop.
    #[error("handler '{name}' failed: {message}")]
    Handler { name: String, message: String },

    /// Configuration references a method no handler is registered for.
    #[error("no handler registered for method '{0}'")]
    UnknownMethod(String),

    /// Configuration references a tool no handler is registered for.
    #[error("no tool registered under '{0}'")]
    UnknownTool(String),

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl VibeError {
    /// Create a handler error for the named method or tool.
    pub fn handler(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Handler {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Whether the error means the session could not be located.
    pub fn is_session_not_found(&self) -> bool {
        matches!(self, Self::SessionNotFound(_))
    }
}

/// Result type for session, loop and handler operations
pub type VibeResult<T> = Result<T, VibeError>;
