//! `ping`

use async_trait::async_trait;
use tracing::debug;

use super::AgentMethod;
use crate::error::VibeResult;
use crate::protocol::{AgentSuccess, Params, RequestId};
use crate::server::VibeContext;

pub struct Ping;

#[async_trait]
impl AgentMethod for Ping {
    fn method_name(&self) -> &'static str {
        "ping"
    }

    async fn handle(
        &self,
        cx: &mut VibeContext<'_>,
        request_id: Option<RequestId>,
        _params: Option<Params>,
    ) -> VibeResult<()> {
        debug!(session_id = %cx.session_id(), "Ping!");
        let response = AgentSuccess::new().add_id(request_id).send_back_nothing();
        cx.respond(response.supply()).await
    }
}
