//! `tools/list` and `tools/call`

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use super::AgentMethod;
use crate::error::VibeResult;
use crate::protocol::{AgentSuccess, ErrorCode, Params, RequestId};
use crate::server::VibeContext;
use crate::session::ToolInvocationRequest;
use crate::tools::extract_tool_name;

/// Lists every registered tool definition
pub struct ListTools;

#[async_trait]
impl AgentMethod for ListTools {
    fn method_name(&self) -> &'static str {
        "tools/list"
    }

    async fn handle(
        &self,
        cx: &mut VibeContext<'_>,
        request_id: Option<RequestId>,
        _params: Option<Params>,
    ) -> VibeResult<()> {
        let tools = cx.tools.definitions();
        debug!(session_id = %cx.session_id(), count = tools.len(), "Listing tools");
        let response = AgentSuccess::new()
            .add_id(request_id)
            .queue_result(json!({ "tools": tools }));
        cx.respond(response.supply()).await
    }
}

/// Entry point for `tools/call`.
///
/// Does not run the tool itself: it parks a [`ToolInvocationRequest`] in the
/// session's tool slot and a later tick of the stream loop executes it.
pub struct InvokeTool;

#[async_trait]
impl AgentMethod for InvokeTool {
    fn method_name(&self) -> &'static str {
        "tools/call"
    }

    async fn handle(
        &self,
        cx: &mut VibeContext<'_>,
        request_id: Option<RequestId>,
        params: Option<Params>,
    ) -> VibeResult<()> {
        let Some(name) = params.as_ref().and_then(extract_tool_name).map(str::to_string) else {
            return cx
                .reject(request_id, ErrorCode::InvalidParams, "Tool name is required")
                .await;
        };

        if !cx.tools.contains(&name) {
            warn!(session_id = %cx.session_id(), tool = %name, "Unknown tool requested");
            return cx
                .reject(
                    request_id,
                    ErrorCode::ToolNotFound,
                    format!("Tool not found: {}", name),
                )
                .await;
        }

        let request = ToolInvocationRequest {
            session_id: cx.session_id().to_string(),
            request_id,
            tool: name,
            request_body: params,
        };
        cx.update(move |sesh| {
            sesh.add_tool_invocation(request);
        })
        .await
    }
}
