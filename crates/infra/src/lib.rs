//! # SpendView Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The retrying HTTP client and error conversions
//! - The Ramp data source (token, pagination, concurrent listing fetch)
//! - Google sign-in (PKCE authorization, code exchange, session issue)
//! - Snapshot cache stores (in-memory and JSON file)
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `spendview-core`
//! - Depends on `spendview-common` and `spendview-core`
//! - Contains all "impure" code (network and filesystem I/O)

pub mod cache;
pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;

// Re-export commonly used items
pub use cache::{FileCacheStore, MemoryCacheStore};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::google::{CompletedLogin, GoogleOAuthClient, OAuthFlow};
pub use integrations::ramp::{RampClient, RampDataSource, Resource};
