//! Google OAuth 2.0 endpoints: authorization URL, code exchange, userinfo

use std::fmt;

use reqwest::{Method, Url};
use spendview_common::auth::{OAuthError, TokenResponse, UserInfo};
use spendview_domain::constants::OAUTH_SCOPES;
use spendview_domain::{IdentityConfig, Result, SpendViewError};
use tracing::{debug, warn};

use crate::http::HttpClient;

pub const GOOGLE_AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";

#[derive(Clone)]
pub struct GoogleOAuthClient {
    http: HttpClient,
    client_id: String,
    client_secret: String,
    authorization_endpoint: Url,
    token_endpoint: Url,
    userinfo_endpoint: Url,
}

impl fmt::Debug for GoogleOAuthClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleOAuthClient")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("authorization_endpoint", &self.authorization_endpoint.as_str())
            .field("token_endpoint", &self.token_endpoint.as_str())
            .field("userinfo_endpoint", &self.userinfo_endpoint.as_str())
            .finish()
    }
}

fn endpoint(configured: Option<&str>, default: &str) -> Result<Url> {
    let raw = configured.unwrap_or(default);
    Url::parse(raw).map_err(|e| SpendViewError::Config(format!("Invalid OAuth endpoint {raw}: {e}")))
}

impl GoogleOAuthClient {
    /// # Errors
    /// `SpendViewError::Config` when the client id or secret is missing or an
    /// endpoint override does not parse.
    pub fn from_config(config: &IdentityConfig) -> Result<Self> {
        let client_id = config
            .client_id
            .clone()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| SpendViewError::Config("GOOGLE_CLIENT_ID is not configured".into()))?;
        let client_secret = config
            .client_secret
            .clone()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| SpendViewError::Config("GOOGLE_CLIENT_SECRET is not configured".into()))?;

        Ok(Self {
            http: HttpClient::new()?,
            client_id,
            client_secret,
            authorization_endpoint: endpoint(
                config.authorization_endpoint.as_deref(),
                GOOGLE_AUTHORIZATION_ENDPOINT,
            )?,
            token_endpoint: endpoint(config.token_endpoint.as_deref(), GOOGLE_TOKEN_ENDPOINT)?,
            userinfo_endpoint: endpoint(
                config.userinfo_endpoint.as_deref(),
                GOOGLE_USERINFO_ENDPOINT,
            )?,
        })
    }

    /// Where to send the browser to start a login.
    pub fn authorization_url(&self, redirect_uri: &str, state: &str, code_challenge: &str) -> Url {
        let mut url = self.authorization_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", OAUTH_SCOPES)
            .append_pair("access_type", "online")
            .append_pair("include_granted_scopes", "true")
            .append_pair("state", state)
            .append_pair("code_challenge", code_challenge)
            .append_pair("code_challenge_method", "S256")
            .append_pair("prompt", "select_account");
        url
    }

    /// Redeem an authorization code. Never retried: codes are single use.
    pub async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse> {
        let request = self
            .http
            .request(Method::POST, self.token_endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code_verifier", code_verifier),
            ]);

        let response = self.http.send_once(request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let reason = serde_json::from_str::<OAuthError>(&body)
                .map(|err| err.to_string())
                .unwrap_or_else(|_| format!("HTTP {}", status.as_u16()));
            warn!(status = status.as_u16(), %reason, "authorization code exchange rejected");
            return Err(SpendViewError::Auth(format!("Token exchange failed: {reason}")));
        }

        let tokens: TokenResponse = response
            .json()
            .await
            .map_err(|e| SpendViewError::Auth(format!("Unreadable token response: {e}")))?;
        debug!(expires_in = ?tokens.expires_in, "authorization code exchanged");
        Ok(tokens)
    }

    pub async fn fetch_user_info(&self, access_token: &str) -> Result<UserInfo> {
        let response = self
            .http
            .send(
                self.http
                    .request(Method::GET, self.userinfo_endpoint.clone())
                    .bearer_auth(access_token),
            )
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "userinfo request rejected");
            return Err(SpendViewError::Auth(format!(
                "Userinfo request failed: HTTP {}",
                status.as_u16()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| SpendViewError::Auth(format!("Unreadable userinfo response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GoogleOAuthClient {
        GoogleOAuthClient::from_config(&IdentityConfig {
            client_id: Some("client-123".into()),
            client_secret: Some("shh".into()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn authorization_url_carries_pkce_and_state() {
        let url = client().authorization_url(
            "https://spend.example.com/api/auth/callback",
            "sealed",
            "chal",
        );
        assert!(url.as_str().starts_with(GOOGLE_AUTHORIZATION_ENDPOINT));

        let params: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(params["client_id"], "client-123");
        assert_eq!(params["redirect_uri"], "https://spend.example.com/api/auth/callback");
        assert_eq!(params["response_type"], "code");
        assert_eq!(params["scope"], "openid email profile");
        assert_eq!(params["state"], "sealed");
        assert_eq!(params["code_challenge"], "chal");
        assert_eq!(params["code_challenge_method"], "S256");
        assert_eq!(params["prompt"], "select_account");
    }

    #[test]
    fn missing_credentials_are_config_errors() {
        let err = GoogleOAuthClient::from_config(&IdentityConfig::default()).unwrap_err();
        assert!(matches!(err, SpendViewError::Config(_)));
    }

    #[test]
    fn debug_redacts_the_secret() {
        assert!(!format!("{:?}", client()).contains("shh"));
    }
}
