//! Protocol types for MCP and JSON-RPC communication
//!
//! This module contains the wire-level types and the response builders.

pub mod builders;
mod jsonrpc;
mod mcp;

pub use builders::{AgentAcknowledge, AgentError, AgentInitializeResponse, AgentSuccess};
pub use jsonrpc::{
    AgentVibe, ErrorCode, ErrorObject, Params, RequestId, ResponseEnvelope, JSONRPC_VERSION,
};
pub use mcp::{McpTool, Occasion, ServerInfo, PROTOCOL_VERSION};
