//! Zotero client configuration.
//!
//! Credentials are read from the environment exactly once, by the binary,
//! and handed to [`crate::zotero::ZoteroClient`] as a plain value.

use crate::error::{Result, ZoterError};
use std::time::Duration;

/// Environment variable holding the numeric Zotero user id
pub const USER_ID_VAR: &str = "ZOTERO_USER_ID";

/// Environment variable holding the private API key
pub const API_KEY_VAR: &str = "ZOTERO_API_KEY";

/// Optional override for the API base URL
pub const API_BASE_VAR: &str = "ZOTERO_API_BASE";

/// Public Zotero web API
pub const DEFAULT_API_BASE: &str = "https://api.zotero.org";

/// Connection settings for the Zotero web API
#[derive(Debug, Clone)]
pub struct ZoteroConfig {
    /// Zotero user id (a string of digits)
    pub user_id: String,
    /// Private key from Settings -> Feeds/API
    pub api_key: String,
    /// API root, without trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ZoteroConfig {
    /// Build a config against the public API.
    pub fn new(user_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            api_key: api_key.into(),
            base_url: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Point the config at a different API root (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Read `ZOTERO_USER_ID`, `ZOTERO_API_KEY` and `ZOTERO_API_BASE`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ZoteroConfig::from_env`] but with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ZoterError::Config(format!("{} is not set", name)))
        };

        let config = Self::new(required(USER_ID_VAR)?, required(API_KEY_VAR)?);
        match lookup(API_BASE_VAR).filter(|v| !v.trim().is_empty()) {
            Some(base) => Ok(config.with_base_url(base)),
            None => Ok(config),
        }
    }
}
