//! JSON-RPC 2.0 protocol types

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON-RPC version string carried by every envelope
pub const JSONRPC_VERSION: &str = "2.0";

/// Method/tool parameters as sent by the agent
pub type Params = Map<String, Value>;

/// JSON-RPC request id.
///
/// An absent id stays `None` all the way through to the response envelope,
/// which then omits the `id` member.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{}", n),
            RequestId::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RequestId {
    fn from(value: i64) -> Self {
        RequestId::Number(value)
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        RequestId::String(value.to_string())
    }
}

/// Inbound agent request posted to the messages endpoint.
///
/// The session id may arrive in the body or in the query string; the HTTP
/// layer fills it in before handing the vibe to the router.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AgentVibe {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub id: Option<RequestId>,
    #[serde(default)]
    pub params: Option<Params>,
}

impl AgentVibe {
    /// Build a vibe for the given session and method
    pub fn new(
        session_id: impl Into<String>,
        method: impl Into<String>,
        id: Option<RequestId>,
        params: Option<Params>,
    ) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            session_id: session_id.into(),
            id,
            params,
        }
    }

    /// Check the envelope shape: version 2.0, a method, a session.
    pub fn validate(&self) -> Result<(), String> {
        if self.jsonrpc != JSONRPC_VERSION {
            return Err("jsonrpc must be '2.0'".to_string());
        }
        if self.method.trim().is_empty() {
            return Err("method is required".to_string());
        }
        if self.session_id.trim().is_empty() {
            return Err("session_id is required".to_string());
        }
        Ok(())
    }
}

/// Error codes understood by MCP clients. Values must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Parse,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    Internal,
    SessionNotFound,
    ToolNotFound,
    ResourceNotFound,
    ResourceTypeNotFound,
}

impl ErrorCode {
    pub fn code(self) -> i32 {
        match self {
            ErrorCode::Parse => -32700,
            ErrorCode::InvalidRequest => -32600,
            ErrorCode::MethodNotFound => -32601,
            ErrorCode::InvalidParams => -32602,
            ErrorCode::Internal => -32603,
            ErrorCode::SessionNotFound => -31000,
            ErrorCode::ToolNotFound => -31001,
            ErrorCode::ResourceNotFound => -31002,
            ErrorCode::ResourceTypeNotFound => -31003,
        }
    }
}

/// JSON-RPC 2.0 Error Object
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub data: Option<Value>,
}

impl ErrorObject {
    /// Create a new error object
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            message: message.into(),
            data: None,
        }
    }
}

/// Outbound JSON-RPC envelope: `result` XOR `error`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<RequestId>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<ErrorObject>,
}

impl ResponseEnvelope {
    /// Create a success envelope
    pub fn success(id: Option<RequestId>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error envelope
    pub fn error(id: Option<RequestId>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(ErrorObject::new(code, message)),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Convert into a JSON value for a session event payload
    pub fn into_value(self) -> Value {
        // Serializing a struct of plain fields cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_codes_match_wire_values() {
        assert_eq!(ErrorCode::Parse.code(), -32700);
        assert_eq!(ErrorCode::InvalidRequest.code(), -32600);
        assert_eq!(ErrorCode::MethodNotFound.code(), -32601);
        assert_eq!(ErrorCode::InvalidParams.code(), -32602);
        assert_eq!(ErrorCode::Internal.code(), -32603);
        assert_eq!(ErrorCode::SessionNotFound.code(), -31000);
        assert_eq!(ErrorCode::ToolNotFound.code(), -31001);
        assert_eq!(ErrorCode::ResourceNotFound.code(), -31002);
        assert_eq!(ErrorCode::ResourceTypeNotFound.code(), -31003);
    }

    #[test]
    fn test_request_id_accepts_numbers_strings_and_null() {
        let vibe: AgentVibe = serde_json::from_value(json!({
            "jsonrpc": "2.0", "method": "ping", "session_id": "s", "id": 7
        }))
        .unwrap();
        assert_eq!(vibe.id, Some(RequestId::Number(7)));

        let vibe: AgentVibe = serde_json::from_value(json!({
            "jsonrpc": "2.0", "method": "ping", "session_id": "s", "id": "abc"
        }))
        .unwrap();
        assert_eq!(vibe.id, Some(RequestId::String("abc".to_string())));

        let vibe: AgentVibe = serde_json::from_value(json!({
            "jsonrpc": "2.0", "method": "notifications/initialized", "session_id": "s", "id": null
        }))
        .unwrap();
        assert!(vibe.id.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_envelopes() {
        let mut vibe = AgentVibe::new("s", "ping", None, None);
        assert!(vibe.validate().is_ok());

        vibe.jsonrpc = "1.0".to_string();
        assert!(vibe.validate().is_err());

        let vibe = AgentVibe::new("", "ping", None, None);
        assert_eq!(vibe.validate().unwrap_err(), "session_id is required");
    }

    #[test]
    fn test_envelope_omits_missing_id() {
        let value = ResponseEnvelope::success(None, json!({})).into_value();
        assert_eq!(value, json!({"jsonrpc": "2.0", "result": {}}));

        let value =
            ResponseEnvelope::error(Some(3.into()), ErrorCode::Internal, "boom").into_value();
        assert_eq!(
            value,
            json!({"jsonrpc": "2.0", "id": 3, "error": {"code": -32603, "message": "boom"}})
        );
    }
}
