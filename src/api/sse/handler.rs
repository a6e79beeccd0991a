//! SSE and MCP HTTP handlers

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{Query, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_stream::{wrappers::UnboundedReceiverStream, StreamExt};
use tracing::{info, warn};

use super::auth::bearer_token;
use super::AppState;
use crate::api::ApiError;
use crate::protocol::{AgentVibe, ErrorCode, RequestId, ResponseEnvelope, PROTOCOL_VERSION};
use crate::server::{ChannelSink, VibeTransporter};

/// Query parameters for opening a stream
#[derive(Debug, Default, Deserialize)]
pub struct ChannelParams {
    pub token: Option<String>,
}

/// GET /mcp/sse - open a session and stream its events
pub async fn open_channel(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<ChannelParams>,
) -> Result<Response, ApiError> {
    let user = if state.config.service.requires_authentication {
        let token = params
            .token
            .as_deref()
            .or_else(|| bearer_token(&headers))
            .ok_or(ApiError::Unauthorized)?;
        Some(state.tokens.lookup(token).ok_or(ApiError::Unauthorized)?)
    } else {
        None
    };

    let sesh = state
        .sessions
        .open(&state.config.routes.messages_uri, user)
        .await?;
    let session_id = sesh.session_id.clone();

    let (sink, rx) = ChannelSink::new();
    let transport =
        VibeTransporter::from_config(session_id.clone(), Box::new(sink), &state.config.service);

    let stream_loop = state.stream_loop.clone();
    tokio::spawn(async move {
        // Failures are logged by the loop itself
        let _ = stream_loop.start(session_id, transport).await;
    });

    let stream = UnboundedReceiverStream::new(rx).map(Ok::<_, Infallible>);
    let mut response = Response::new(Body::from_stream(stream));
    for (name, value) in &state.config.sse.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                response.headers_mut().insert(name, value);
            }
            _ => warn!(header = %name, "Skipping invalid SSE header"),
        }
    }

    Ok(response)
}

/// Query parameters for posting a message
#[derive(Debug, Default, Deserialize)]
pub struct MessageParams {
    pub session_id: Option<String>,
}

/// POST /mcp/sse/messages - hand an agent request to its session
///
/// The answer is `202 Accepted`; the JSON-RPC response follows on the stream.
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MessageParams>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let raw: Value = serde_json::from_slice(&body).map_err(|e| {
        ApiError::BadRequest(ResponseEnvelope::error(None, ErrorCode::Parse, e.to_string()))
    })?;

    let id: Option<RequestId> = raw
        .get("id")
        .and_then(|v| serde_json::from_value(v.clone()).ok());

    let mut vibe: AgentVibe = serde_json::from_value(raw).map_err(|e| {
        ApiError::BadRequest(ResponseEnvelope::error(
            id.clone(),
            ErrorCode::InvalidRequest,
            e.to_string(),
        ))
    })?;

    if let Some(session_id) = params.session_id.filter(|s| !s.is_empty()) {
        vibe.session_id = session_id;
    }

    vibe.validate().map_err(|message| {
        ApiError::BadRequest(ResponseEnvelope::error(id, ErrorCode::InvalidRequest, message))
    })?;

    info!(session_id = %vibe.session_id, method = %vibe.method, "Agent request received");
    state.router.handle(vibe).await?;
    Ok(StatusCode::ACCEPTED)
}

/// GET /mcp/info - server info
#[derive(Debug, Serialize)]
pub struct ServerInfoResponse {
    pub name: String,
    pub version: String,
    pub protocol_version: String,
    pub tool_count: usize,
    pub method_count: usize,
    pub active_sessions: usize,
}

pub async fn server_info_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let info = ServerInfoResponse {
        name: state.config.service.server_name.clone(),
        version: state.config.service.server_version.clone(),
        protocol_version: PROTOCOL_VERSION.to_string(),
        tool_count: state.tools.len(),
        method_count: state.methods.len(),
        active_sessions: state.sessions.count().await?,
    };
    Ok(Json(info))
}
