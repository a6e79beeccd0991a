//! Server configuration
//!
//! Layered with figment: built-in defaults, then the TOML file (a missing
//! file is skipped), then `VIBES_*` environment variables. Nested keys use
//! `__` as the separator:
//!
//! ```bash
//! VIBES_CONFIG=vibes.toml                  # config file path
//! VIBES_SERVICE__REQUIRES_AUTHENTICATION=true
//! VIBES_SERVICE__HEARTBEAT_INTERVAL_SECS=20
//! VIBES_SERVER__PORT=3030
//! VIBES_AUTH__TOKENS='[{token="tok1",entity_id="42"}]'
//! ```
//!
//! A few short names are kept as aliases: `VIBE_SVC_NAME`,
//! `VIBE_SVC_VERSION`, `VIBES_REQUIRE_AUTH`, `VIBES_HEARTBEAT_INTERVAL`
//! (seconds), `VIBES_SESSION_TTL` (minutes) and `VIBES_PORT`.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{VibeError, VibeResult};

/// Default config file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "vibes.toml";

/// Short environment names and the config keys they set
const ENV_ALIASES: &[(&str, &str)] = &[
    ("VIBE_SVC_NAME", "service.server_name"),
    ("VIBE_SVC_VERSION", "service.server_version"),
    ("VIBES_REQUIRE_AUTH", "service.requires_authentication"),
    ("VIBES_HEARTBEAT_INTERVAL", "service.heartbeat_interval_secs"),
    ("VIBES_SESSION_TTL", "service.session_ttl_minutes"),
    ("VIBES_PORT", "server.port"),
];

// -----------------------------------------------------------------------------
// VibesConfig (root)
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VibesConfig {
    pub service: ServiceConfig,
    pub server: ServerConfig,
    pub sse: SseConfig,
    pub routes: RoutesConfig,
    pub features: FeaturesConfig,
    pub auth: AuthConfig,
    /// Methods agents may invoke. `None` enables every built-in method.
    pub invocable_methods: Option<Vec<String>>,
    /// Tools agents may call. `None` enables every built-in tool.
    pub tools: Option<Vec<String>>,
}

impl VibesConfig {
    /// Defaults < TOML file < environment
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("VIBES_").split("__"))
            .merge(Env::raw().filter_map(|key| {
                ENV_ALIASES
                    .iter()
                    .find(|(alias, _)| key.as_str().eq_ignore_ascii_case(alias))
                    .map(|(_, path)| path.to_string().into())
            }))
    }

    /// Load a config file plus environment overrides
    pub fn load(path: impl AsRef<Path>) -> VibeResult<Self> {
        Self::extract(Self::figment(path))
    }

    /// Load `VIBES_CONFIG` (or `vibes.toml`) plus environment overrides
    pub fn from_env() -> VibeResult<Self> {
        let path =
            std::env::var("VIBES_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(path)
    }

    /// Parse TOML text over the defaults, without the environment
    pub fn from_toml(contents: &str) -> VibeResult<Self> {
        Self::extract(
            Figment::from(Serialized::defaults(Self::default())).merge(Toml::string(contents)),
        )
    }

    fn extract(figment: Figment) -> VibeResult<Self> {
        figment
            .extract()
            .map_err(|e| VibeError::Config(e.to_string()))
    }
}

// -----------------------------------------------------------------------------
// ServiceConfig
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server_name: String,
    pub server_version: String,
    pub requires_authentication: bool,
    pub heartbeat_interval_secs: u64,
    pub poll_interval_ms: u64,
    pub session_ttl_minutes: u64,
    /// Turn handler failures into INTERNAL error frames instead of ending the stream
    pub catch_exceptions: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server_name: "laravel-vibes-server".to_string(),
            server_version: "1.0.0".to_string(),
            requires_authentication: false,
            heartbeat_interval_secs: 20,
            poll_interval_ms: 100,
            session_ttl_minutes: 5,
            catch_exceptions: false,
        }
    }
}

impl ServiceConfig {
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_minutes * 60)
    }
}

// -----------------------------------------------------------------------------
// ServerConfig
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3030,
        }
    }
}

// -----------------------------------------------------------------------------
// SseConfig / RoutesConfig
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SseConfig {
    /// Headers set on every stream response
    pub headers: BTreeMap<String, String>,
}

impl Default for SseConfig {
    fn default() -> Self {
        let headers = [
            ("Content-Type", "text/event-stream"),
            ("Cache-Control", "no-cache"),
            ("Connection", "keep-alive"),
            ("X-Accel-Buffering", "no"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self { headers }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    pub sse_uri: String,
    pub messages_uri: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            sse_uri: "/mcp/sse".to_string(),
            messages_uri: "/mcp/sse/messages".to_string(),
        }
    }
}

// -----------------------------------------------------------------------------
// FeaturesConfig
// -----------------------------------------------------------------------------

/// MCP features the server is willing to advertise
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    pub tools: bool,
    pub resources: bool,
    pub prompts: bool,
    pub logging: bool,
    pub roots: bool,
    pub sampling: bool,
    pub experimental: bool,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            tools: true,
            resources: false,
            prompts: false,
            logging: false,
            roots: false,
            sampling: false,
            experimental: false,
        }
    }
}

// -----------------------------------------------------------------------------
// AuthConfig
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    pub tokens: Vec<AgentToken>,
}

/// An access token handed to an agent, bound to one identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentToken {
    pub token: String,
    pub entity_id: String,
    #[serde(default = "default_entity_type")]
    pub entity_type: String,
}

fn default_entity_type() -> String {
    "user".to_string()
}
