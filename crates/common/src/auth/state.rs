//! Stateless OAuth state parameter
//!
//! The PKCE verifier and an issue timestamp travel through the identity
//! provider's redirect inside the `state` parameter, sealed with AES-256-GCM.
//! No server-side storage or cookies are needed between the two legs.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pkce::{generate_nonce, PkceChallenge};
use crate::crypto::EncryptionService;
use crate::error::{CommonError, CommonResult};

const STATE_PURPOSE: &str = "spendview/oauth-state/v1";
/// Tolerated clock skew for timestamps slightly in the future.
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Contents of the sealed state parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthState {
    pub verifier: String,
    pub nonce: String,
    /// Seconds since the Unix epoch
    pub issued_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Could not be decoded, decrypted or parsed
    Invalid(String),
    /// Older than the allowed window
    Expired { age_secs: i64 },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(message) => write!(f, "Invalid OAuth state: {}", message),
            Self::Expired { age_secs } => write!(f, "OAuth state expired ({}s old)", age_secs),
        }
    }
}

impl std::error::Error for StateError {}

/// Seals and opens state parameters under one secret
#[derive(Debug)]
pub struct StateSealer {
    cipher: EncryptionService,
    max_age_secs: i64,
}

impl StateSealer {
    pub fn new(secret: impl AsRef<[u8]>, max_age_secs: i64) -> CommonResult<Self> {
        let cipher = EncryptionService::from_secret(secret.as_ref(), STATE_PURPOSE)?;
        Ok(Self { cipher, max_age_secs })
    }

    /// Start an authorization attempt: fresh PKCE pair plus its sealed state.
    pub fn begin(&self, now: DateTime<Utc>) -> CommonResult<(PkceChallenge, String)> {
        let pkce = PkceChallenge::generate();
        let state = OAuthState {
            verifier: pkce.code_verifier.clone(),
            nonce: generate_nonce(),
            issued_at: now.timestamp(),
        };
        let sealed = self.seal(&state)?;
        Ok((pkce, sealed))
    }

    pub fn seal(&self, state: &OAuthState) -> CommonResult<String> {
        let json = serde_json::to_vec(state).map_err(CommonError::from)?;
        self.cipher.seal(&json)
    }

    pub fn open(&self, token: &str, now: DateTime<Utc>) -> Result<OAuthState, StateError> {
        let plaintext = self.cipher.open(token).map_err(|e| StateError::Invalid(e.to_string()))?;
        let state: OAuthState =
            serde_json::from_slice(&plaintext).map_err(|e| StateError::Invalid(e.to_string()))?;

        if state.verifier.is_empty() {
            return Err(StateError::Invalid("missing PKCE verifier".to_string()));
        }

        let age_secs = now.timestamp() - state.issued_at;
        if age_secs < -MAX_CLOCK_SKEW_SECS {
            return Err(StateError::Invalid("issued in the future".to_string()));
        }
        if age_secs > self.max_age_secs {
            return Err(StateError::Expired { age_secs });
        }

        Ok(state)
    }
}
