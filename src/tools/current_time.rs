//! Get current time tool

use async_trait::async_trait;
use serde_json::json;

use super::{text_content, VibeTool};
use crate::error::VibeResult;
use crate::protocol::{AgentSuccess, McpTool, Params, RequestId};
use crate::server::VibeContext;
use crate::utils::time::current_time_info;

/// Tool for getting the current datetime and timestamp
pub struct GetCurrentTimeTool;

impl GetCurrentTimeTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GetCurrentTimeTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VibeTool for GetCurrentTimeTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "get_current_time",
            "Get the current datetime and timestamp",
            json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        )
    }

    async fn execute(
        &self,
        cx: &mut VibeContext<'_>,
        request_id: Option<RequestId>,
        _params: Option<Params>,
    ) -> VibeResult<()> {
        let time_info = current_time_info();
        let response = AgentSuccess::new()
            .add_id(request_id)
            .queue_result(text_content(serde_json::to_string_pretty(&time_info)?));
        cx.respond(response.supply()).await
    }
}
