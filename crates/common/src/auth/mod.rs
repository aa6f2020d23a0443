//! OAuth 2.0 + PKCE building blocks and session credentials
//!
//! ```text
//! begin:    StateSealer::begin ──► (PkceChallenge, sealed state) ──► redirect
//! callback: StateSealer::open ──► verifier ──► token exchange (infra)
//!           ──► EmailDomainPolicy ──► SessionTokenCodec::issue ──► cookie
//! ```
//!
//! Everything here is pure; HTTP calls to the identity provider live in the
//! infra crate.

pub mod pkce;
pub mod session;
pub mod state;
pub mod types;

pub use pkce::{generate_code_challenge, generate_code_verifier, PkceChallenge};
pub use session::{SessionTokenCodec, SessionTokenError};
pub use state::{OAuthState, StateError, StateSealer};
pub use types::{
    EmailDomainPolicy, OAuthError, SessionClaims, SessionIdentity, SessionUser, TokenResponse,
    UserInfo,
};
