//! Agent access tokens
//!
//! When authentication is required, an agent opens its stream with
//! `?token=...` (or an `Authorization: Bearer ...` header). Tokens are
//! configured up front and each maps to exactly one identity.

use std::collections::HashMap;

use axum::http::{header, HeaderMap};

use crate::config::AuthConfig;
use crate::session::AuthenticatedUser;

/// Token → identity lookup
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    tokens: HashMap<String, AuthenticatedUser>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(auth: &AuthConfig) -> Self {
        let mut store = Self::new();
        for entry in &auth.tokens {
            store.add_token(
                entry.token.clone(),
                AuthenticatedUser::new(entry.entity_id.clone(), entry.entity_type.clone()),
            );
        }
        store
    }

    pub fn add_token(&mut self, token: impl Into<String>, user: AuthenticatedUser) {
        self.tokens.insert(token.into(), user);
    }

    /// The identity a token belongs to, if any
    pub fn lookup(&self, token: &str) -> Option<AuthenticatedUser> {
        if token.is_empty() {
            return None;
        }
        self.tokens.get(token).cloned()
    }
}

/// Extract the token from an `Authorization: Bearer` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}
