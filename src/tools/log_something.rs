//! Log tool

use async_trait::async_trait;
use tracing::info;

use super::{message_schema, required_message, text_content, VibeTool};
use crate::error::VibeResult;
use crate::protocol::{AgentSuccess, McpTool, Params, RequestId};
use crate::server::VibeContext;

/// Writes the agent's message to the server log
pub struct LogSomethingTool;

impl LogSomethingTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogSomethingTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VibeTool for LogSomethingTool {
    fn definition(&self) -> McpTool {
        McpTool::new("log_something", "It will go in the app's log!", message_schema())
    }

    async fn execute(
        &self,
        cx: &mut VibeContext<'_>,
        request_id: Option<RequestId>,
        params: Option<Params>,
    ) -> VibeResult<()> {
        let message = match required_message("log_something", params.as_ref()) {
            Ok(message) => message,
            Err((code, message)) => return cx.reject(request_id, code, message).await,
        };

        info!(session_id = %cx.session_id(), "{}", message);
        let response = AgentSuccess::new()
            .add_id(request_id)
            .queue_result(text_content(format!("Sent msg - {} - to the log!", message)));
        cx.respond(response.supply()).await
    }
}
