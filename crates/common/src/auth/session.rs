//! Session token codec
//!
//! Compact signed credential: `base64url(header).base64url(payload).base64url(sig)`
//! where `sig = HMAC-SHA256(secret, "header.payload")`. The layout matches an
//! HS256 JWT so standard tooling can inspect issued tokens.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::types::{SessionClaims, SessionIdentity};
use crate::crypto::mac;
use crate::error::CommonError;

#[derive(Serialize)]
struct Header {
    alg: &'static str,
    typ: &'static str,
}

const HEADER: Header = Header { alg: "HS256", typ: "JWT" };

/// Why a session token was rejected (or could not be issued)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionTokenError {
    /// Not three dot-separated base64url segments
    Malformed,
    /// Signature does not match the recomputed HMAC
    SignatureMismatch,
    /// Payload is not valid claims JSON
    Payload(String),
    /// `exp` lies in the past
    Expired { expired_at: i64 },
    /// Secret or signing failure on the issuing side
    Signing(String),
}

impl fmt::Display for SessionTokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "Malformed session token"),
            Self::SignatureMismatch => write!(f, "Session token signature mismatch"),
            Self::Payload(message) => write!(f, "Invalid session token payload: {}", message),
            Self::Expired { expired_at } => write!(f, "Session token expired at {}", expired_at),
            Self::Signing(message) => write!(f, "Session token signing failed: {}", message),
        }
    }
}

impl std::error::Error for SessionTokenError {}

impl From<CommonError> for SessionTokenError {
    fn from(err: CommonError) -> Self {
        Self::Signing(err.to_string())
    }
}

/// Issue a token for `identity`, valid for `ttl_seconds` from `now`.
///
/// Deterministic for identical inputs.
pub fn issue(
    identity: &SessionIdentity,
    secret: &[u8],
    ttl_seconds: i64,
    now: DateTime<Utc>,
) -> Result<String, SessionTokenError> {
    if secret.is_empty() {
        return Err(SessionTokenError::Signing("empty secret".to_string()));
    }

    let iat = now.timestamp();
    let claims = SessionClaims {
        sub: identity.subject.clone(),
        email: identity.email.clone(),
        name: identity.name.clone(),
        picture: identity.picture.clone(),
        iat,
        exp: iat.saturating_add(ttl_seconds),
    };

    let header = encode_json(&HEADER)?;
    let payload = encode_json(&claims)?;
    let signing_input = format!("{header}.{payload}");
    let signature = mac::sign(secret, signing_input.as_bytes())?;

    Ok(format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(signature)))
}

/// Verify a token and return its claims.
///
/// Never panics; every failure maps to a [`SessionTokenError`].
pub fn verify(
    token: &str,
    secret: &[u8],
    now: DateTime<Utc>,
) -> Result<SessionClaims, SessionTokenError> {
    let mut segments = token.trim().split('.');
    let (Some(header), Some(payload), Some(signature), None) =
        (segments.next(), segments.next(), segments.next(), segments.next())
    else {
        return Err(SessionTokenError::Malformed);
    };
    if header.is_empty() || payload.is_empty() || signature.is_empty() {
        return Err(SessionTokenError::Malformed);
    }

    let signature =
        URL_SAFE_NO_PAD.decode(signature).map_err(|_| SessionTokenError::Malformed)?;
    let signing_input = format!("{header}.{payload}");
    if !mac::verify(secret, signing_input.as_bytes(), &signature)? {
        return Err(SessionTokenError::SignatureMismatch);
    }

    let payload = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| SessionTokenError::Payload(e.to_string()))?;
    let claims: SessionClaims =
        serde_json::from_slice(&payload).map_err(|e| SessionTokenError::Payload(e.to_string()))?;

    if claims.exp < now.timestamp() {
        return Err(SessionTokenError::Expired { expired_at: claims.exp });
    }

    Ok(claims)
}

fn encode_json<T: Serialize>(value: &T) -> Result<String, SessionTokenError> {
    let bytes = serde_json::to_vec(value).map_err(|e| SessionTokenError::Payload(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Session codec bound to one secret and lifetime
#[derive(Clone)]
pub struct SessionTokenCodec {
    secret: Vec<u8>,
    ttl_seconds: i64,
}

impl fmt::Debug for SessionTokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokenCodec")
            .field("secret", &"[REDACTED]")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl SessionTokenCodec {
    pub fn new(secret: impl AsRef<[u8]>, ttl_seconds: i64) -> Result<Self, CommonError> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(CommonError::config_field("session.secret", "must not be empty"));
        }
        if ttl_seconds <= 0 {
            return Err(CommonError::config_field("session.ttl_seconds", "must be positive"));
        }
        Ok(Self { secret: secret.to_vec(), ttl_seconds })
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    pub fn issue(&self, identity: &SessionIdentity) -> Result<String, SessionTokenError> {
        self.issue_at(identity, Utc::now())
    }

    pub fn issue_at(
        &self,
        identity: &SessionIdentity,
        now: DateTime<Utc>,
    ) -> Result<String, SessionTokenError> {
        issue(identity, &self.secret, self.ttl_seconds, now)
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, SessionTokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionClaims, SessionTokenError> {
        verify(token, &self.secret, now).map_err(|err| {
            debug!(reason = %err, "session token rejected");
            err
        })
    }
}
