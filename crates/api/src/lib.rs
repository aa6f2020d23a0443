//! # SpendView API
//!
//! HTTP application layer - routes and main entry point.
//!
//! This crate contains:
//! - axum routes (browser → backend bridge)
//! - Application context (dependency injection)
//! - Cookie, request-origin and logging helpers
//!
//! ## Architecture
//! - Depends on `common`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - Serves the dashboard data, sign-in and export endpoints

pub mod context;
pub mod error;
pub mod routes;
pub mod utils;

// Re-export for convenience
pub use context::AppContext;
pub use error::ApiError;
pub use routes::router;
