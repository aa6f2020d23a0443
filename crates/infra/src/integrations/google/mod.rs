//! Google sign-in

pub mod client;
pub mod flow;

pub use client::GoogleOAuthClient;
pub use flow::{CompletedLogin, OAuthFlow};
