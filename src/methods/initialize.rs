//! `initialize`

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use super::AgentMethod;
use crate::error::VibeResult;
use crate::protocol::{AgentInitializeResponse, Params, RequestId, ServerInfo};
use crate::server::VibeContext;

/// Client name that gets every enabled capability regardless of what it asks for
const INSPECTOR_CLIENT: &str = "mcp-inspector";

pub struct SessionInitialized;

/// Loose truthiness for capability flags: `true`, non-empty objects and
/// arrays, non-zero numbers and non-empty strings all count as a request.
fn requested(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Object(map)) => !map.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::String(s)) => !s.is_empty() && s != "0",
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
    }
}

#[async_trait]
impl AgentMethod for SessionInitialized {
    fn method_name(&self) -> &'static str {
        "initialize"
    }

    async fn handle(
        &self,
        cx: &mut VibeContext<'_>,
        request_id: Option<RequestId>,
        params: Option<Params>,
    ) -> VibeResult<()> {
        let params = params.unwrap_or_default();
        let service = &cx.config.service;

        let mut response = AgentInitializeResponse::new()
            .add_id(request_id)
            .add_server_info(ServerInfo::new(
                service.server_name.clone(),
                service.server_version.clone(),
            ))
            .with_capabilities();

        if let Some(version) = params.get("protocolVersion").and_then(Value::as_str) {
            response = response.add_protocol_version(version);
        }

        let client_name = params
            .get("clientInfo")
            .and_then(|c| c.get("name"))
            .and_then(Value::as_str);

        if client_name == Some(INSPECTOR_CLIENT) {
            response = response.reveal_everything();
        } else if let Some(Value::Object(caps)) = params.get("capabilities") {
            if requested(caps.get("tools")) {
                response = response.reveal_tools();
            }
            if requested(caps.get("prompts")) {
                response = response.reveal_prompts();
            }
            if requested(caps.get("resources")) {
                response = response.reveal_resources();
            }
        }

        info!(
            session_id = %cx.session_id(),
            client = client_name.unwrap_or("unknown"),
            "Session initialized"
        );
        let envelope = response.supply(&cx.config.features);
        cx.respond(envelope).await
    }
}
