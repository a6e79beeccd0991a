//! Response builders for JSON-RPC envelopes sent over the stream
//!
//! Each builder starts from the same base (version + optional id) and
//! produces a [`ResponseEnvelope`]. They are pure values: no I/O happens
//! until the envelope is handed to a session.

use serde_json::{json, Map, Value};

use super::jsonrpc::{ErrorCode, RequestId, ResponseEnvelope};
use super::mcp::{ServerInfo, PROTOCOL_VERSION};
use crate::config::FeaturesConfig;

/// Acknowledges a fire-and-forget notification with `result: {}`
#[derive(Debug, Clone, Default)]
pub struct AgentAcknowledge {
    id: Option<RequestId>,
}

impl AgentAcknowledge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_id(mut self, id: Option<RequestId>) -> Self {
        self.id = id;
        self
    }

    pub fn supply(self) -> ResponseEnvelope {
        ResponseEnvelope::success(self.id, Value::Object(Map::new()))
    }
}

/// Success envelope carrying a queued result, or `{}` when told to send back nothing
#[derive(Debug, Clone, Default)]
pub struct AgentSuccess {
    id: Option<RequestId>,
    result: Option<Value>,
    empty_object: bool,
}

impl AgentSuccess {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_id(mut self, id: Option<RequestId>) -> Self {
        self.id = id;
        self
    }

    pub fn queue_result(mut self, result: Value) -> Self {
        self.result = Some(result);
        self
    }

    pub fn send_back_nothing(mut self) -> Self {
        self.empty_object = true;
        self
    }

    pub fn supply(self) -> ResponseEnvelope {
        let result = if self.empty_object {
            Value::Object(Map::new())
        } else {
            self.result.unwrap_or_else(|| Value::Array(Vec::new()))
        };
        ResponseEnvelope::success(self.id, result)
    }
}

/// Error envelope with a fixed error code and free-text message
#[derive(Debug, Clone, Default)]
pub struct AgentError {
    id: Option<RequestId>,
}

impl AgentError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_id(mut self, id: Option<RequestId>) -> Self {
        self.id = id;
        self
    }

    pub fn supply(self, code: ErrorCode, message: impl Into<String>) -> ResponseEnvelope {
        ResponseEnvelope::error(self.id, code, message)
    }
}

/// Reply to `initialize`.
///
/// Capabilities are only revealed when both the client asked for them and
/// the server has the feature switched on.
#[derive(Debug, Clone)]
pub struct AgentInitializeResponse {
    id: Option<RequestId>,
    protocol_version: String,
    server_info: Option<ServerInfo>,
    show_capabilities: bool,
    reveal_all: bool,
    reveal_tools: bool,
    reveal_resources: bool,
    reveal_prompts: bool,
}

impl Default for AgentInitializeResponse {
    fn default() -> Self {
        Self {
            id: None,
            protocol_version: PROTOCOL_VERSION.to_string(),
            server_info: None,
            show_capabilities: false,
            reveal_all: false,
            reveal_tools: false,
            reveal_resources: false,
            reveal_prompts: false,
        }
    }
}

impl AgentInitializeResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_id(mut self, id: Option<RequestId>) -> Self {
        self.id = id;
        self
    }

    pub fn add_protocol_version(mut self, version: impl Into<String>) -> Self {
        self.protocol_version = version.into();
        self
    }

    pub fn add_server_info(mut self, info: ServerInfo) -> Self {
        self.server_info = Some(info);
        self
    }

    pub fn with_capabilities(mut self) -> Self {
        self.show_capabilities = true;
        self
    }

    pub fn reveal_everything(mut self) -> Self {
        self.reveal_all = true;
        self
    }

    pub fn reveal_tools(mut self) -> Self {
        self.reveal_tools = true;
        self
    }

    pub fn reveal_resources(mut self) -> Self {
        self.reveal_resources = true;
        self
    }

    pub fn reveal_prompts(mut self) -> Self {
        self.reveal_prompts = true;
        self
    }

    pub fn supply(self, features: &FeaturesConfig) -> ResponseEnvelope {
        let mut result = Map::new();
        result.insert(
            "protocolVersion".to_string(),
            Value::String(self.protocol_version),
        );
        result.insert(
            "serverInfo".to_string(),
            self.server_info
                .map(|info| json!({"name": info.name, "version": info.version}))
                .unwrap_or_else(|| Value::Object(Map::new())),
        );

        if self.show_capabilities {
            let mut capabilities = Map::new();
            if (self.reveal_all || self.reveal_tools) && features.tools {
                capabilities.insert("tools".to_string(), json!({"listChanged": true}));
            }
            if (self.reveal_all || self.reveal_resources) && features.resources {
                capabilities.insert("resources".to_string(), json!({"listChanged": true}));
            }
            if (self.reveal_all || self.reveal_prompts) && features.prompts {
                capabilities.insert("prompts".to_string(), json!({"listChanged": false}));
            }
            result.insert("capabilities".to_string(), Value::Object(capabilities));
        }

        ResponseEnvelope::success(self.id, Value::Object(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acknowledge_is_empty_object() {
        let value = AgentAcknowledge::new().add_id(Some(1.into())).supply().into_value();
        assert_eq!(value, json!({"jsonrpc": "2.0", "id": 1, "result": {}}));
    }

    #[test]
    fn test_success_queued_result_and_send_back_nothing() {
        let value = AgentSuccess::new()
            .add_id(Some("req-1".into()))
            .queue_result(json!({"tools": []}))
            .supply()
            .into_value();
        assert_eq!(value["id"], "req-1");
        assert_eq!(value["result"], json!({"tools": []}));

        let value = AgentSuccess::new()
            .add_id(Some(7.into()))
            .queue_result(json!({"ignored": true}))
            .send_back_nothing()
            .supply()
            .into_value();
        assert_eq!(value, json!({"jsonrpc": "2.0", "id": 7, "result": {}}));
    }

    #[test]
    fn test_error_carries_code_and_message() {
        let envelope = AgentError::new()
            .add_id(Some(2.into()))
            .supply(ErrorCode::MethodNotFound, "Method 'nope' not found");
        assert!(envelope.is_error());
        let value = envelope.into_value();
        assert_eq!(value["error"]["code"], -32601);
        assert_eq!(value["error"]["message"], "Method 'nope' not found");
        assert!(value.get("result").is_none());
    }

    #[test]
    fn test_initialize_reveals_only_enabled_features() {
        let features = FeaturesConfig {
            tools: true,
            ..FeaturesConfig::default()
        };
        let value = AgentInitializeResponse::new()
            .add_id(Some(0.into()))
            .add_server_info(ServerInfo::new("vibes", "1.0.0"))
            .with_capabilities()
            .reveal_everything()
            .supply(&features)
            .into_value();

        assert_eq!(value["result"]["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(value["result"]["serverInfo"]["name"], "vibes");
        assert_eq!(value["result"]["capabilities"], json!({"tools": {"listChanged": true}}));
    }

    #[test]
    fn test_initialize_empty_capabilities_is_object() {
        let value = AgentInitializeResponse::new()
            .with_capabilities()
            .reveal_prompts()
            .supply(&FeaturesConfig::default())
            .into_value();
        assert_eq!(value["result"]["capabilities"], json!({}));
        assert!(value.get("id").is_none());
    }
}
