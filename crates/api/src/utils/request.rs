//! Externally visible origin of a request

use axum::http::header::HOST;
use axum::http::HeaderMap;
use spendview_domain::ServerConfig;

const FORWARDED_PROTO: &str = "x-forwarded-proto";
const FORWARDED_HOST: &str = "x-forwarded-host";

fn first_header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// `scheme://host` as seen by the browser.
///
/// The configured public URL wins; otherwise forwarded headers, then `Host`.
pub fn origin(server: &ServerConfig, headers: &HeaderMap) -> String {
    if let Some(public) = server.public_url.as_deref().filter(|url| !url.trim().is_empty()) {
        return public.trim().trim_end_matches('/').to_string();
    }

    let proto = first_header(headers, FORWARDED_PROTO).unwrap_or("http");
    let host = first_header(headers, FORWARDED_HOST)
        .or_else(|| first_header(headers, HOST.as_str()))
        .unwrap_or("localhost:3000");
    format!("{proto}://{host}")
}

/// Redirect URI registered with the identity provider.
pub fn callback_url(server: &ServerConfig, headers: &HeaderMap) -> String {
    format!("{}/api/auth/callback", origin(server, headers))
}

/// Whether cookies should carry `Secure`.
pub fn is_secure(server: &ServerConfig, headers: &HeaderMap) -> bool {
    origin(server, headers).starts_with("https://")
}
