//! MCP tools
//!
//! Tools are dispatched by the stream loop once `tools/call` has parked a
//! request in the session's tool slot:
//! - `echo`: repeats the message back
//! - `log_something`: writes the message to the server log
//! - `get_current_time`: current datetime and timestamp

mod current_time;
mod echo;
mod log_something;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::config::VibesConfig;
use crate::error::{VibeError, VibeResult};
use crate::protocol::{ErrorCode, McpTool, Params, RequestId};
use crate::server::VibeContext;

pub use current_time::GetCurrentTimeTool;
pub use echo::EchoTool;
pub use log_something::LogSomethingTool;

/// A tool an agent can call through `tools/call`
#[async_trait]
pub trait VibeTool: Send + Sync {
    /// Name, description and input schema advertised by `tools/list`
    fn definition(&self) -> McpTool;

    /// Run the tool and queue its response on the session.
    ///
    /// `params` is the whole `tools/call` params object (`{name, arguments}`).
    async fn execute(
        &self,
        cx: &mut VibeContext<'_>,
        request_id: Option<RequestId>,
        params: Option<Params>,
    ) -> VibeResult<()>;

    fn name(&self) -> String {
        self.definition().name
    }
}

/// Every tool this crate ships with
pub fn builtin_tools() -> Vec<Arc<dyn VibeTool>> {
    vec![
        Arc::new(EchoTool::new()),
        Arc::new(LogSomethingTool::new()),
        Arc::new(GetCurrentTimeTool::new()),
    ]
}

/// Tool name → tool table
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn VibeTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in tool
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for tool in builtin_tools() {
            registry.register(tool);
        }
        registry
    }

    /// Registry limited to `tools` when the config lists them
    pub fn from_config(config: &VibesConfig) -> VibeResult<Self> {
        let Some(names) = &config.tools else {
            return Ok(Self::with_defaults());
        };

        let builtins: HashMap<String, Arc<dyn VibeTool>> =
            builtin_tools().into_iter().map(|t| (t.name(), t)).collect();

        let mut registry = Self::new();
        for name in names {
            let tool = builtins
                .get(name)
                .ok_or_else(|| VibeError::UnknownTool(name.clone()))?;
            registry.register(tool.clone());
        }
        Ok(registry)
    }

    /// Register a tool under its advertised name
    pub fn register(&mut self, tool: Arc<dyn VibeTool>) -> &mut Self {
        self.tools.insert(tool.name(), tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn VibeTool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tool definitions sorted by name
    pub fn definitions(&self) -> Vec<McpTool> {
        let mut tools: Vec<McpTool> = self.tools.values().map(|t| t.definition()).collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }
}

/// Extract tool arguments from `tools/call` params
pub fn extract_arguments(params: &Params) -> Value {
    params
        .get("arguments")
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()))
}

/// Extract tool name from `tools/call` params
pub fn extract_tool_name(params: &Params) -> Option<&str> {
    params.get("name").and_then(|v| v.as_str())
}

/// Build a text content result
pub fn text_content(text: impl Into<String>) -> Value {
    json!({
        "content": [{
            "type": "text",
            "text": text.into()
        }]
    })
}

/// Schema shared by the tools that take a single `message` string
pub(crate) fn message_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "message": { "type": "string" }
        },
        "required": ["message"]
    })
}

/// Pull `arguments.message` out of the params, or say which protocol error
/// the tool should answer with.
pub(crate) fn required_message(
    tool: &str,
    params: Option<&Params>,
) -> Result<String, (ErrorCode, String)> {
    let Some(params) = params else {
        return Err((ErrorCode::InvalidParams, format!("{} - Invalid parameters", tool)));
    };
    let message = extract_arguments(params)
        .get("message")
        .map(|m| match m {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });
    message.ok_or_else(|| (ErrorCode::Internal, format!("{} - Arguments Missing", tool)))
}
