//! HTTP surface for agents
//!
//! Routes agents use to open session streams and post requests, plus the
//! health and info endpoints.

pub mod http;
pub mod sse;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use crate::error::VibeError;
use crate::protocol::{ErrorCode, ResponseEnvelope};

pub use http::create_router;
pub use sse::AppState;

/// Failures on the HTTP side, mapped onto status codes
#[derive(Debug)]
pub enum ApiError {
    /// Authentication is required and the token is missing or unknown
    Unauthorized,
    /// The posted message is not a usable JSON-RPC request
    BadRequest(ResponseEnvelope),
    /// Routing or session handling failed
    Internal(VibeError),
}

impl From<VibeError> for ApiError {
    fn from(e: VibeError) -> Self {
        Self::Internal(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
            Self::BadRequest(envelope) => {
                warn!(error = ?envelope.error, "Rejected agent request");
                (StatusCode::BAD_REQUEST, Json(envelope)).into_response()
            }
            Self::Internal(e) => {
                error!(error = %e, "Request failed");
                let code = if e.is_session_not_found() {
                    ErrorCode::SessionNotFound
                } else {
                    ErrorCode::Internal
                };
                let envelope = ResponseEnvelope::error(None, code, e.to_string());
                (StatusCode::INTERNAL_SERVER_ERROR, Json(envelope)).into_response()
            }
        }
    }
}
