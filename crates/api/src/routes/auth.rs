//! Google sign-in routes and the session endpoints

use axum::extract::{Query, State};
use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use spendview_common::auth::SessionClaims;
use spendview_domain::SpendViewError;
use tracing::{info, warn};

use super::AppState;
use crate::context::AppContext;
use crate::error::ApiError;
use crate::utils::cookies::{cleared_session_cookie, session_cookie, session_token};
use crate::utils::request::{callback_url, is_secure};

/// Query parameters of the identity provider's redirect back to us
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set by the provider when the user declined or the request was bad
    pub error: Option<String>,
}

/// 302 to `location`, optionally setting a cookie.
fn found(location: &str, cookie: Option<String>) -> Response {
    let mut response = StatusCode::FOUND.into_response();
    match HeaderValue::from_str(location) {
        Ok(value) => {
            response.headers_mut().insert(LOCATION, value);
        }
        Err(_) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
    if let Some(value) = cookie.and_then(|c| HeaderValue::from_str(&c).ok()) {
        response.headers_mut().append(SET_COOKIE, value);
    }
    response
}

fn error_page(reason: &str) -> String {
    format!("/auth/error?error={}", urlencoding::encode(reason))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Claims of the request's session cookie, if it verifies.
pub(crate) fn current_session(ctx: &AppContext, headers: &HeaderMap) -> Option<SessionClaims> {
    session_token(headers).and_then(|token| ctx.session(token))
}

/// `GET /api/auth/google`
pub async fn begin(State(ctx): State<AppState>, headers: HeaderMap) -> Response {
    let flow = match ctx.oauth() {
        Ok(flow) => flow,
        Err(err) => return ApiError::from(err).into_response(),
    };

    let redirect_uri = callback_url(&ctx.config.server, &headers);
    match flow.begin(&redirect_uri) {
        Ok(url) => found(url.as_str(), None),
        Err(err) => ApiError::from(err).into_response(),
    }
}

/// `GET /api/auth/callback`
///
/// State and domain-policy failures land on the error page with a coarse
/// reason. Provider failures during the exchange answer 500 with detail.
pub async fn callback(
    State(ctx): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Response {
    if let Some(reason) = non_empty(params.error) {
        warn!(reason = %reason, "identity provider returned an error");
        return found(&error_page(&reason), None);
    }

    let (Some(code), Some(state)) = (non_empty(params.code), non_empty(params.state)) else {
        return ApiError::BadRequest("Missing authorization code or state parameter".into())
            .into_response();
    };

    let flow = match ctx.oauth() {
        Ok(flow) => flow,
        Err(err) => return ApiError::from(err).into_response(),
    };

    let redirect_uri = callback_url(&ctx.config.server, &headers);
    match flow.complete(&code, &state, &redirect_uri).await {
        Ok(login) => {
            let secure = is_secure(&ctx.config.server, &headers);
            let cookie = session_cookie(&login.session_token, ctx.session_ttl_seconds(), secure);
            found("/", Some(cookie))
        }
        Err(err @ (SpendViewError::StateValidation(_) | SpendViewError::AccessDenied(_))) => {
            info!(reason = err.reason_code(), "sign-in refused");
            found(&error_page(err.reason_code()), None)
        }
        Err(err) => {
            warn!(error = %err, "sign-in failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.reason_code(), "detail": err.to_string() })),
            )
                .into_response()
        }
    }
}

/// `GET /api/auth/session` and `GET /api/session`
pub async fn session(State(ctx): State<AppState>, headers: HeaderMap) -> Json<Value> {
    let user = current_session(&ctx, &headers).map(|claims| claims.user());
    Json(json!({ "user": user }))
}

/// `GET /api/auth/signout`
pub async fn signout(State(ctx): State<AppState>, headers: HeaderMap) -> Response {
    found("/", Some(cleared_session_cookie(is_secure(&ctx.config.server, &headers))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_page_encodes_the_reason() {
        assert_eq!(error_page("AccessDenied"), "/auth/error?error=AccessDenied");
        assert_eq!(error_page("access denied&x"), "/auth/error?error=access%20denied%26x");
    }

    #[test]
    fn found_sets_location_and_cookie() {
        let response = found("/", Some("session_token=a; Path=/".into()));
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[LOCATION], "/");
        assert_eq!(response.headers()[SET_COOKIE], "session_token=a; Path=/");
    }
}
