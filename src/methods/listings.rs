//! `resources/list` and `prompts/list`
//!
//! Neither resources nor prompts have providers yet, so both listings come
//! back empty.

use async_trait::async_trait;
use serde_json::json;

use super::AgentMethod;
use crate::error::VibeResult;
use crate::protocol::{AgentSuccess, Params, RequestId};
use crate::server::VibeContext;

pub struct ListResources;

#[async_trait]
impl AgentMethod for ListResources {
    fn method_name(&self) -> &'static str {
        "resources/list"
    }

    async fn handle(
        &self,
        cx: &mut VibeContext<'_>,
        request_id: Option<RequestId>,
        _params: Option<Params>,
    ) -> VibeResult<()> {
        let response = AgentSuccess::new()
            .add_id(request_id)
            .queue_result(json!({ "resources": [] }));
        cx.respond(response.supply()).await
    }
}

pub struct ListPrompts;

#[async_trait]
impl AgentMethod for ListPrompts {
    fn method_name(&self) -> &'static str {
        "prompts/list"
    }

    async fn handle(
        &self,
        cx: &mut VibeContext<'_>,
        request_id: Option<RequestId>,
        _params: Option<Params>,
    ) -> VibeResult<()> {
        let response = AgentSuccess::new()
            .add_id(request_id)
            .queue_result(json!({ "prompts": [] }));
        cx.respond(response.supply()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::testing::Harness;

    #[tokio::test]
    async fn test_empty_listings() {
        let harness = Harness::new();

        let sesh = harness.session().await;
        let mut cx = harness.context(sesh);
        ListResources.handle(&mut cx, Some(2.into()), None).await.unwrap();
        let payload = harness.pending_payload(cx.session_id()).await;
        assert_eq!(payload["result"], json!({"resources": []}));

        let sesh = harness.session().await;
        let mut cx = harness.context(sesh);
        ListPrompts.handle(&mut cx, Some(3.into()), None).await.unwrap();
        let payload = harness.pending_payload(cx.session_id()).await;
        assert_eq!(payload["id"], 3);
        assert_eq!(payload["result"], json!({"prompts": []}));
    }
}
