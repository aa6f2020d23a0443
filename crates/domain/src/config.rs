//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    CACHE_MAX_AGE_HOURS, DEFAULT_ALLOWED_EMAIL_DOMAIN, DEFAULT_FETCH_ATTEMPTS,
    DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAX_PAGES, DEFAULT_PAGE_LIMIT, SESSION_TTL_SECS,
};
use crate::impl_domain_keyword_conversions;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub identity: IdentityConfig,
    pub session: SessionConfig,
    pub cache: CacheConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Externally visible origin (e.g. `https://spend.example.com`). When
    /// absent the origin is derived from forwarded request headers.
    pub public_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_addr: "0.0.0.0:3000".to_string(), public_url: None }
    }
}

/// Which provider deployment to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderEnvironment {
    Sandbox,
    #[default]
    Production,
}

impl_domain_keyword_conversions!(ProviderEnvironment {
    Sandbox => "sandbox",
    Production => "production",
});

impl ProviderEnvironment {
    /// Base URL of the provider's developer API for this environment.
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://demo-api.ramp.com",
            Self::Production => "https://api.ramp.com",
        }
    }
}

/// Expense provider (spend-management API) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub client_id: Option<String>,
    #[serde(skip_serializing)]
    pub client_secret: Option<String>,
    pub environment: ProviderEnvironment,
    /// Overrides the environment's base URL (tests, proxies).
    pub base_url: Option<String>,
    pub page_limit: u32,
    pub max_pages: u32,
    pub request_timeout_secs: u64,
    pub max_attempts: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            environment: ProviderEnvironment::default(),
            base_url: None,
            page_limit: DEFAULT_PAGE_LIMIT,
            max_pages: DEFAULT_MAX_PAGES,
            request_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            max_attempts: DEFAULT_FETCH_ATTEMPTS,
        }
    }
}

impl ProviderConfig {
    /// Effective base URL, honouring the explicit override.
    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| self.environment.base_url().to_string())
            .trim_end_matches('/')
            .to_string()
    }

    /// Both halves of the client credentials, if configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.client_id.as_deref(), self.client_secret.as_deref()) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => Some((id, secret)),
            _ => None,
        }
    }
}

/// Identity provider (Google Workspace) configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub client_id: Option<String>,
    #[serde(skip_serializing)]
    pub client_secret: Option<String>,
    /// Endpoint overrides, used against local mock servers.
    pub authorization_endpoint: Option<String>,
    pub token_endpoint: Option<String>,
    pub userinfo_endpoint: Option<String>,
}

/// Session issuance configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    #[serde(skip_serializing)]
    pub secret: Option<String>,
    pub ttl_seconds: i64,
    pub allowed_email_domain: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: None,
            ttl_seconds: SESSION_TTL_SECS,
            allowed_email_domain: DEFAULT_ALLOWED_EMAIL_DOMAIN.to_string(),
        }
    }
}

/// Local snapshot cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// JSON file holding the last good snapshot; in-memory when absent.
    pub path: Option<String>,
    pub max_age_hours: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { path: None, max_age_hours: CACHE_MAX_AGE_HOURS }
    }
}
