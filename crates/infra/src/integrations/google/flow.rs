//! Login flow: authorization redirect, callback validation, session issue
//!
//! The callback leg runs strictly in order (state, code exchange, userinfo,
//! domain policy, session) and stops at the first failure. No session is
//! issued unless every step succeeds.

use chrono::{DateTime, Utc};
use reqwest::Url;
use spendview_common::auth::{
    EmailDomainPolicy, SessionClaims, SessionIdentity, SessionTokenCodec, StateSealer,
};
use spendview_domain::constants::OAUTH_STATE_MAX_AGE_SECS;
use spendview_domain::{Config, Result, SpendViewError};
use tracing::{info, warn};

use super::client::GoogleOAuthClient;

/// A successful login
#[derive(Debug, Clone)]
pub struct CompletedLogin {
    /// Value for the session cookie
    pub session_token: String,
    pub claims: SessionClaims,
}

#[derive(Debug)]
pub struct OAuthFlow {
    client: GoogleOAuthClient,
    sealer: StateSealer,
    codec: SessionTokenCodec,
    policy: EmailDomainPolicy,
}

impl OAuthFlow {
    pub fn new(
        client: GoogleOAuthClient,
        sealer: StateSealer,
        codec: SessionTokenCodec,
        policy: EmailDomainPolicy,
    ) -> Self {
        Self { client, sealer, codec, policy }
    }

    /// # Errors
    /// `SpendViewError::Config` when the identity provider client or the
    /// session secret is missing.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = GoogleOAuthClient::from_config(&config.identity)?;
        let secret = config
            .session
            .secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| SpendViewError::Config("SESSION_SECRET is not configured".into()))?;

        let sealer = StateSealer::new(secret, OAUTH_STATE_MAX_AGE_SECS)
            .map_err(|e| SpendViewError::Config(e.to_string()))?;
        let codec = SessionTokenCodec::new(secret, config.session.ttl_seconds)
            .map_err(|e| SpendViewError::Config(e.to_string()))?;
        let policy = EmailDomainPolicy::parse(&config.session.allowed_email_domain);

        Ok(Self::new(client, sealer, codec, policy))
    }

    pub fn codec(&self) -> &SessionTokenCodec {
        &self.codec
    }

    /// Authorization URL for a fresh login attempt.
    pub fn begin(&self, redirect_uri: &str) -> Result<Url> {
        self.begin_at(redirect_uri, Utc::now())
    }

    pub fn begin_at(&self, redirect_uri: &str, now: DateTime<Utc>) -> Result<Url> {
        let (pkce, state) = self
            .sealer
            .begin(now)
            .map_err(|e| SpendViewError::Internal(format!("Failed to seal OAuth state: {e}")))?;
        Ok(self.client.authorization_url(redirect_uri, &state, &pkce.code_challenge))
    }

    pub async fn complete(
        &self,
        code: &str,
        state: &str,
        redirect_uri: &str,
    ) -> Result<CompletedLogin> {
        self.complete_at(code, state, redirect_uri, Utc::now()).await
    }

    /// Validate the callback and issue a session.
    ///
    /// # Errors
    /// - `StateValidation` for a tampered, foreign or expired state
    /// - `Auth` when the code exchange or userinfo call fails
    /// - `AccessDenied` when the account has no usable email or its domain
    ///   is not allowed
    pub async fn complete_at(
        &self,
        code: &str,
        state: &str,
        redirect_uri: &str,
        now: DateTime<Utc>,
    ) -> Result<CompletedLogin> {
        let opened = self.sealer.open(state, now).map_err(|err| {
            warn!(reason = %err, "OAuth state rejected");
            SpendViewError::StateValidation(err.to_string())
        })?;

        let tokens = self.client.exchange_code(code, &opened.verifier, redirect_uri).await?;
        let user_info = self.client.fetch_user_info(&tokens.access_token).await?;

        let identity = SessionIdentity::from_user_info(&user_info).ok_or_else(|| {
            SpendViewError::AccessDenied("identity provider returned no email".into())
        })?;

        if user_info.email_verified == Some(false) {
            return Err(SpendViewError::AccessDenied("email address is not verified".into()));
        }

        if !self.policy.permits(&identity.email) {
            let domain = identity.email.rsplit_once('@').map_or("", |(_, d)| d);
            warn!(domain, "login from a domain outside the allow-list");
            return Err(SpendViewError::AccessDenied(format!("domain '{domain}' is not allowed")));
        }

        let session_token = self
            .codec
            .issue_at(&identity, now)
            .map_err(|e| SpendViewError::Internal(format!("Failed to issue session: {e}")))?;
        let claims = self
            .codec
            .verify_at(&session_token, now)
            .map_err(|e| SpendViewError::Internal(format!("Issued session does not verify: {e}")))?;

        info!(subject = %claims.sub, "login completed");
        Ok(CompletedLogin { session_token, claims })
    }

    /// Claims of a valid, unexpired session token.
    pub fn session(&self, token: &str) -> Option<SessionClaims> {
        self.codec.verify(token).ok()
    }
}
