//! Echo tool

use async_trait::async_trait;

use super::{message_schema, required_message, text_content, VibeTool};
use crate::error::VibeResult;
use crate::protocol::{AgentSuccess, McpTool, Params, RequestId};
use crate::server::VibeContext;

/// Echoes back the message it is sent
pub struct EchoTool;

impl EchoTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EchoTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VibeTool for EchoTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "echo",
            "Echoes back the message you send it",
            message_schema(),
        )
    }

    async fn execute(
        &self,
        cx: &mut VibeContext<'_>,
        request_id: Option<RequestId>,
        params: Option<Params>,
    ) -> VibeResult<()> {
        match required_message("echo", params.as_ref()) {
            Ok(message) => {
                let response = AgentSuccess::new()
                    .add_id(request_id)
                    .queue_result(text_content(message));
                cx.respond(response.supply()).await
            }
            Err((code, message)) => cx.reject(request_id, code, message).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::testing::Harness;
    use serde_json::json;

    #[tokio::test]
    async fn test_echo_returns_message() {
        let harness = Harness::new();
        let sesh = harness.session().await;
        let mut cx = harness.context(sesh);
        let params = json!({"name": "echo", "arguments": {"message": "hello"}});

        EchoTool
            .execute(&mut cx, Some(9.into()), params.as_object().cloned())
            .await
            .unwrap();

        let payload = harness.pending_payload(cx.session_id()).await;
        assert_eq!(
            payload,
            json!({
                "jsonrpc": "2.0",
                "id": 9,
                "result": {"content": [{"type": "text", "text": "hello"}]}
            })
        );
    }

    #[tokio::test]
    async fn test_echo_without_params() {
        let harness = Harness::new();
        let sesh = harness.session().await;
        let mut cx = harness.context(sesh);

        EchoTool.execute(&mut cx, Some(9.into()), None).await.unwrap();

        let payload = harness.pending_payload(cx.session_id()).await;
        assert_eq!(payload["error"]["code"], -32602);
        assert_eq!(payload["error"]["message"], "echo - Invalid parameters");
    }
}
