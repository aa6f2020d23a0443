//! HTTP routes
//!
//! - `GET /api/data` - raw provider envelope, always 200
//! - `GET /api/auth/google`, `/api/auth/callback`, `/api/auth/signout`
//! - `GET /api/auth/session`, `/api/session` - current user or `null`
//! - `GET /api/dashboard`, `/api/export` - filtered view and CSV (session required)
//! - `GET /api/health`

pub mod auth;
pub mod dashboard;
pub mod data;
pub mod health;

use std::sync::Arc;

use axum::http::Method;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::context::AppContext;

/// Shared state for axum handlers.
pub type AppState = Arc<AppContext>;

/// Build the axum router (separated for testing).
pub fn router(ctx: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    let public_data = Router::new().route("/api/data", get(data::data)).layer(cors);

    Router::new()
        .merge(public_data)
        .route("/api/health", get(health::health))
        .route("/api/auth/google", get(auth::begin))
        .route("/api/auth/callback", get(auth::callback))
        .route("/api/auth/signout", get(auth::signout))
        .route("/api/auth/session", get(auth::session))
        .route("/api/session", get(auth::session))
        .route("/api/dashboard", get(dashboard::view))
        .route("/api/export", get(dashboard::export))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
