//! MCP (Model Context Protocol) types

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol version reported when the client does not ask for one
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// MCP Tool definition
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct McpTool {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl McpTool {
    /// Create a new MCP tool definition
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// Server information for MCP handshake
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

impl ServerInfo {
    /// Create new server info
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Category of an outbound frame, written as the SSE `event:` field
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Occasion {
    Endpoint,
    Heartbeat,
    Message,
    Ping,
    Error,
    Open,
    Close,
}

impl Occasion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Occasion::Endpoint => "endpoint",
            Occasion::Heartbeat => "heartbeat",
            Occasion::Message => "message",
            Occasion::Ping => "ping",
            Occasion::Error => "error",
            Occasion::Open => "open",
            Occasion::Close => "close",
        }
    }
}

impl fmt::Display for Occasion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occasion_serializes_as_event_name() {
        assert_eq!(serde_json::to_string(&Occasion::Endpoint).unwrap(), "\"endpoint\"");
        assert_eq!(Occasion::Heartbeat.to_string(), "heartbeat");
        let parsed: Occasion = serde_json::from_str("\"close\"").unwrap();
        assert_eq!(parsed, Occasion::Close);
    }

    #[test]
    fn test_tool_definition_uses_camel_case_schema_key() {
        let tool = McpTool::new("echo", "Echoes", serde_json::json!({"type": "object"}));
        let value = serde_json::to_value(&tool).unwrap();
        assert!(value.get("inputSchema").is_some());
    }
}
