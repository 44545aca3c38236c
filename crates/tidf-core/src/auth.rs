//! HTTP Basic authentication from the vendor API key.
//!
//! The vendor expects the API key as both user name and password.

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;

/// API key for the feed endpoint. Never printed; `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a key, rejecting empty or whitespace-only values.
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            anyhow::bail!("API key is empty");
        }
        Ok(ApiKey(trimmed.to_string()))
    }

    /// Reads the key from the environment variable `var`.
    pub fn from_env(var: &str) -> Result<Self> {
        let value = std::env::var(var)
            .with_context(|| format!("API key not set: export {} with your API key", var))?;
        Self::new(value).with_context(|| format!("environment variable {} is empty", var))
    }

    /// Value for the `Authorization` header: `Basic base64(key:key)`.
    pub fn basic_auth_header(&self) -> String {
        basic_auth_value(&self.0, &self.0)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// `Basic <base64(user:password)>` per RFC 7617.
pub fn basic_auth_value(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", user, password)))
}
