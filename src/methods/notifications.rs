//! Client notifications. Both are acknowledged with an empty result.

use async_trait::async_trait;
use tracing::{debug, info};

use super::AgentMethod;
use crate::error::VibeResult;
use crate::protocol::{Params, RequestId};
use crate::server::VibeContext;

/// `notifications/initialized`
pub struct InitializationConfirmed;

#[async_trait]
impl AgentMethod for InitializationConfirmed {
    fn method_name(&self) -> &'static str {
        "notifications/initialized"
    }

    async fn handle(
        &self,
        cx: &mut VibeContext<'_>,
        request_id: Option<RequestId>,
        _params: Option<Params>,
    ) -> VibeResult<()> {
        info!(session_id = %cx.session_id(), "Agent confirmed initialization");
        cx.acknowledge(request_id).await
    }
}

/// `notifications/cancelled`
///
/// Handlers run to completion inside the loop, so there is nothing in flight
/// to cancel by the time this is dispatched.
pub struct CancelRequest;

#[async_trait]
impl AgentMethod for CancelRequest {
    fn method_name(&self) -> &'static str {
        "notifications/cancelled"
    }

    async fn handle(
        &self,
        cx: &mut VibeContext<'_>,
        request_id: Option<RequestId>,
        params: Option<Params>,
    ) -> VibeResult<()> {
        let cancelled = params
            .as_ref()
            .and_then(|p| p.get("requestId"))
            .map(|v| v.to_string())
            .unwrap_or_default();
        debug!(session_id = %cx.session_id(), cancelled = %cancelled, "Cancellation notice");
        cx.acknowledge(request_id).await
    }
}
