//! Shared cryptographic primitives used by the platform tier.

pub mod encryption;
pub mod mac;

pub use encryption::EncryptionService;
pub use mac::{sign, verify};
