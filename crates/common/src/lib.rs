//! Common utilities shared across SpendView crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: error types
//! - `observability`: tracing (not included by default)
//! - `platform`: crypto primitives, PKCE, sealed OAuth state, session tokens

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod error;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod auth;
#[cfg(feature = "platform")]
pub mod crypto;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "platform")]
pub use auth::{
    EmailDomainPolicy, SessionClaims, SessionIdentity, SessionTokenCodec, SessionTokenError,
    SessionUser, StateError, StateSealer,
};
#[cfg(feature = "foundation")]
pub use error::{CommonError, CommonResult};
