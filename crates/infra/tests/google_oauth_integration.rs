//! Sign-in flow against a mocked identity provider.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use spendview_common::auth::generate_code_challenge;
use spendview_domain::{Config, IdentityConfig, SessionConfig, SpendViewError};
use spendview_infra::integrations::google::OAuthFlow;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REDIRECT_URI: &str = "https://spend.example.com/api/auth/callback";

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-03-01T09:00:00Z").unwrap().with_timezone(&Utc)
}

fn flow(server: &MockServer) -> OAuthFlow {
    let config = Config {
        identity: IdentityConfig {
            client_id: Some("client-123".into()),
            client_secret: Some("shh".into()),
            authorization_endpoint: Some(format!("{}/authorize", server.uri())),
            token_endpoint: Some(format!("{}/token", server.uri())),
            userinfo_endpoint: Some(format!("{}/userinfo", server.uri())),
        },
        session: SessionConfig { secret: Some("test-session-secret".into()), ..Default::default() },
        ..Default::default()
    };
    OAuthFlow::from_config(&config).unwrap()
}

async fn mount_token(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=auth-code"))
        .and(body_string_contains("code_verifier="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "google-at", "token_type": "Bearer", "expires_in": 3599
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_userinfo(server: &MockServer, email: &str) {
    Mock::given(method("GET"))
        .and(path("/userinfo"))
        .and(header("authorization", "Bearer google-at"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sub": "1234", "email": email, "email_verified": true,
            "name": "Ada Lovelace", "picture": "https://example.com/ada.png"
        })))
        .mount(server)
        .await;
}

fn query(url: &reqwest::Url) -> HashMap<String, String> {
    url.query_pairs().into_owned().collect()
}

#[tokio::test]
async fn completes_login_for_an_allowed_domain() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    mount_userinfo(&server, "ada@coder.com").await;

    let flow = flow(&server);
    let authorize = flow.begin_at(REDIRECT_URI, now()).unwrap();
    assert_eq!(authorize.path(), "/authorize");
    let params = query(&authorize);

    let login = flow
        .complete_at("auth-code", &params["state"], REDIRECT_URI, now() + Duration::minutes(2))
        .await
        .unwrap();

    assert_eq!(login.claims.email, "ada@coder.com");
    assert_eq!(login.claims.sub, "1234");
    assert_eq!(login.claims.exp - login.claims.iat, 8 * 60 * 60);

    // The verifier sent to the token endpoint matches the challenge that
    // went out with the authorization redirect.
    let requests = server.received_requests().await.unwrap();
    let token_request = requests.iter().find(|r| r.url.path() == "/token").unwrap();
    let form: HashMap<String, String> =
        reqwest::Url::parse(&format!("http://x/?{}", String::from_utf8_lossy(&token_request.body)))
            .unwrap()
            .query_pairs()
            .into_owned()
            .collect();
    assert_eq!(generate_code_challenge(&form["code_verifier"]), params["code_challenge"]);
    assert_eq!(form["redirect_uri"], REDIRECT_URI);
}

#[tokio::test]
async fn foreign_domain_is_denied() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    mount_userinfo(&server, "x@other.com").await;

    let flow = flow(&server);
    let state = query(&flow.begin_at(REDIRECT_URI, now()).unwrap())["state"].clone();

    let err = flow.complete_at("auth-code", &state, REDIRECT_URI, now()).await.unwrap_err();
    assert!(matches!(err, SpendViewError::AccessDenied(_)));
    assert_eq!(err.reason_code(), "AccessDenied");
}

#[tokio::test]
async fn expired_state_is_rejected_before_the_code_exchange() {
    let server = MockServer::start().await;
    mount_token(&server, 0).await;

    let flow = flow(&server);
    let state = query(&flow.begin_at(REDIRECT_URI, now()).unwrap())["state"].clone();

    let err = flow
        .complete_at("auth-code", &state, REDIRECT_URI, now() + Duration::minutes(11))
        .await
        .unwrap_err();
    assert!(matches!(err, SpendViewError::StateValidation(_)));
}

#[tokio::test]
async fn tampered_state_is_rejected() {
    let server = MockServer::start().await;
    mount_token(&server, 0).await;

    let flow = flow(&server);
    let mut state = query(&flow.begin_at(REDIRECT_URI, now()).unwrap())["state"].clone();
    let flipped = if &state[10..11] == "A" { "B" } else { "A" };
    state.replace_range(10..11, flipped);

    let err = flow.complete_at("auth-code", &state, REDIRECT_URI, now()).await.unwrap_err();
    assert_eq!(err.reason_code(), "InvalidState");
}

#[tokio::test]
async fn rejected_code_exchange_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant", "error_description": "Bad Request"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let flow = flow(&server);
    let state = query(&flow.begin_at(REDIRECT_URI, now()).unwrap())["state"].clone();

    match flow.complete_at("auth-code", &state, REDIRECT_URI, now()).await {
        Err(SpendViewError::Auth(message)) => assert!(message.contains("invalid_grant")),
        other => panic!("expected auth error, got {other:?}"),
    }
}

#[test]
fn from_config_requires_a_session_secret() {
    let config = Config {
        identity: IdentityConfig {
            client_id: Some("client-123".into()),
            client_secret: Some("shh".into()),
            ..Default::default()
        },
        session: SessionConfig { secret: Some("test-session-secret".into()), ..Default::default() },
        ..Default::default()
    };
    let flow = OAuthFlow::from_config(&config).unwrap();
    assert!(flow.session("not-a-token").is_none());

    let missing_secret = Config { session: SessionConfig::default(), ..config };
    let err = OAuthFlow::from_config(&missing_secret).unwrap_err();
    assert!(matches!(err, SpendViewError::Config(_)));
}
