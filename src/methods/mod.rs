//! MCP method handlers
//!
//! Each handler is bound to one protocol method name through an explicit
//! registration table ([`MethodRegistry`]). The router only accepts methods
//! present in the table; the event loop resolves handlers from it by name.
//!
//! - `initialize`, `ping`
//! - `notifications/initialized`, `notifications/cancelled`
//! - `tools/list`, `tools/call`
//! - `resources/list`, `prompts/list`

mod initialize;
mod listings;
mod notifications;
mod ping;
pub mod tools;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::VibesConfig;
use crate::error::{VibeError, VibeResult};
use crate::protocol::{Params, RequestId};
use crate::server::VibeContext;

pub use initialize::SessionInitialized;
pub use listings::{ListPrompts, ListResources};
pub use notifications::{CancelRequest, InitializationConfirmed};
pub use ping::Ping;
pub use tools::{InvokeTool, ListTools};

/// A protocol method an agent can invoke.
///
/// Handlers run inside the stream loop and are expected to queue their own
/// response on the session before returning.
#[async_trait]
pub trait AgentMethod: Send + Sync {
    /// Protocol method name, e.g. `tools/list`
    fn method_name(&self) -> &'static str;

    async fn handle(
        &self,
        cx: &mut VibeContext<'_>,
        request_id: Option<RequestId>,
        params: Option<Params>,
    ) -> VibeResult<()>;
}

/// Every method handler this crate ships with
pub fn builtin_methods() -> Vec<Arc<dyn AgentMethod>> {
    vec![
        Arc::new(SessionInitialized),
        Arc::new(Ping),
        Arc::new(ListTools),
        Arc::new(InvokeTool),
        Arc::new(ListResources),
        Arc::new(ListPrompts),
        Arc::new(InitializationConfirmed),
        Arc::new(CancelRequest),
    ]
}

/// Method name → handler table
#[derive(Clone, Default)]
pub struct MethodRegistry {
    methods: HashMap<String, Arc<dyn AgentMethod>>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in method
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for method in builtin_methods() {
            registry.register(method);
        }
        registry
    }

    /// Registry limited to `invocable_methods` when the config lists them
    pub fn from_config(config: &VibesConfig) -> VibeResult<Self> {
        let Some(names) = &config.invocable_methods else {
            return Ok(Self::with_defaults());
        };

        let builtins: HashMap<&'static str, Arc<dyn AgentMethod>> = builtin_methods()
            .into_iter()
            .map(|m| (m.method_name(), m))
            .collect();

        let mut registry = Self::new();
        for name in names {
            let method = builtins
                .get(name.as_str())
                .ok_or_else(|| VibeError::UnknownMethod(name.clone()))?;
            registry.register(method.clone());
        }
        Ok(registry)
    }

    /// Register a handler under its method name, replacing any previous one
    pub fn register(&mut self, method: Arc<dyn AgentMethod>) -> &mut Self {
        self.methods.insert(method.method_name().to_string(), method);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn AgentMethod>> {
        self.methods.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Registered method names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.keys().cloned().collect();
        names.sort();
        names
    }
}
