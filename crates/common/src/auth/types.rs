//! OAuth and session types
//!
//! Shapes exchanged with the identity provider plus the claims carried by the
//! session credential.

use std::fmt;

use serde::{Deserialize, Serialize};

/// OAuth token response from the identity provider's token endpoint
///
/// Standard OAuth 2.0 token response format (RFC 6749). Only the access token
/// is needed for the userinfo call; the rest is kept for diagnostics.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub id_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<i64>,
    pub scope: Option<String>,
}

/// OAuth error response from authorization server
///
/// Standard OAuth 2.0 error response format (RFC 6749 §5.2).
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthError {
    pub error: String,
    pub error_description: Option<String>,
}

impl fmt::Display for OAuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_description {
            Some(desc) => write!(f, "{}: {}", self.error, desc),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for OAuthError {}

/// OpenID Connect userinfo response
#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    pub sub: String,
    pub email: Option<String>,
    pub email_verified: Option<bool>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Identity claims placed in a session credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub subject: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

impl SessionIdentity {
    /// Build from userinfo; `None` when the provider withheld the email.
    pub fn from_user_info(info: &UserInfo) -> Option<Self> {
        let email = info.email.as_deref()?.trim();
        if email.is_empty() {
            return None;
        }
        Some(Self {
            subject: info.sub.clone(),
            email: email.to_string(),
            name: info.name.clone(),
            picture: info.picture.clone(),
        })
    }
}

/// Decoded session token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    /// Issued-at, seconds since the Unix epoch
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
}

impl SessionClaims {
    pub fn identity(&self) -> SessionIdentity {
        SessionIdentity {
            subject: self.sub.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            picture: self.picture.clone(),
        }
    }

    /// The subset of claims exposed to the browser.
    pub fn user(&self) -> SessionUser {
        SessionUser {
            email: self.email.clone(),
            name: self.name.clone(),
            picture: self.picture.clone(),
        }
    }
}

/// Public view of the signed-in user (`/api/session`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Email-domain allow-list applied after the identity provider vouches for
/// an address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDomainPolicy {
    domains: Vec<String>,
}

impl EmailDomainPolicy {
    /// Parse a comma-separated list such as `"coder.com, example.org"`.
    /// Leading `@` and surrounding whitespace are ignored.
    pub fn parse(spec: &str) -> Self {
        let domains = spec
            .split(',')
            .map(|domain| domain.trim().trim_start_matches('@').to_ascii_lowercase())
            .filter(|domain| !domain.is_empty())
            .collect();
        Self { domains }
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    /// True when `email` belongs to one of the allowed domains exactly
    /// (subdomains are not accepted). An empty policy admits nobody.
    pub fn permits(&self, email: &str) -> bool {
        let email = email.trim().to_ascii_lowercase();
        let Some((local, domain)) = email.rsplit_once('@') else {
            return false;
        };
        !local.is_empty() && self.domains.iter().any(|allowed| allowed == domain)
    }
}
