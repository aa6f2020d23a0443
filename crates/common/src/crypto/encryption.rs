//! AES-256-GCM sealing for short opaque tokens.
//!
//! The OAuth state parameter carries the PKCE verifier through the identity
//! provider's redirect, so it must be both confidential and tamper-evident.
//! Tokens are `base64url(nonce || ciphertext)`; the key is derived from the
//! configured secret with SHA-256 under a purpose label, so one secret can
//! back several independent ciphers.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::{CommonError, CommonResult};

const NONCE_LEN: usize = 12;

/// AES-GCM encryption service keyed from an application secret.
pub struct EncryptionService {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for EncryptionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionService").field("key", &"[REDACTED]").finish()
    }
}

impl EncryptionService {
    /// Create a new encryption service from a raw 32-byte key.
    pub fn new(key: &[u8]) -> CommonResult<Self> {
        if key.len() != 32 {
            return Err(CommonError::config("Encryption key must be exactly 32 bytes"));
        }

        let cipher = Aes256Gcm::new_from_slice(key).map_err(|e| {
            CommonError::internal(format!("Failed to create encryption cipher: {e}"))
        })?;

        Ok(Self { cipher })
    }

    /// Derive the key as `SHA-256(purpose || 0x00 || secret)`.
    pub fn from_secret(secret: &[u8], purpose: &str) -> CommonResult<Self> {
        if secret.is_empty() {
            return Err(CommonError::config_field("secret", "must not be empty"));
        }

        let mut hasher = Sha256::new();
        hasher.update(purpose.as_bytes());
        hasher.update([0u8]);
        hasher.update(secret);
        Self::new(&hasher.finalize())
    }

    /// Encrypt bytes into a URL-safe token.
    pub fn seal(&self, plaintext: &[u8]) -> CommonResult<String> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
            .map_err(|e| CommonError::internal(format!("Encryption failed: {e}")))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);
        Ok(URL_SAFE_NO_PAD.encode(sealed))
    }

    /// Decode and decrypt a token produced by [`seal`](Self::seal).
    pub fn open(&self, token: &str) -> CommonResult<Vec<u8>> {
        let sealed = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|e| CommonError::validation("token", format!("Base64 decode failed: {e}")))?;

        if sealed.len() <= NONCE_LEN {
            return Err(CommonError::validation("token", "Sealed payload too short"));
        }

        let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
        self.cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| CommonError::validation("token", "Decryption failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_then_open_returns_plaintext() {
        let service = EncryptionService::from_secret(b"session-secret", "oauth-state").unwrap();
        let token = service.seal(b"{\"verifier\":\"abc\"}").unwrap();

        assert!(!token.contains('='));
        assert_eq!(service.open(&token).unwrap(), b"{\"verifier\":\"abc\"}");
    }

    #[test]
    fn nonces_make_tokens_unique() {
        let service = EncryptionService::from_secret(b"session-secret", "oauth-state").unwrap();
        assert_ne!(service.seal(b"same").unwrap(), service.seal(b"same").unwrap());
    }

    #[test]
    fn purpose_separates_keys() {
        let state = EncryptionService::from_secret(b"session-secret", "oauth-state").unwrap();
        let other = EncryptionService::from_secret(b"session-secret", "something-else").unwrap();
        let token = state.seal(b"payload").unwrap();
        assert!(other.open(&token).is_err());
    }

    #[test]
    fn rejects_tampered_and_garbage_tokens() {
        let service = EncryptionService::from_secret(b"session-secret", "oauth-state").unwrap();
        let token = service.seal(b"payload").unwrap();

        let mut bytes = URL_SAFE_NO_PAD.decode(&token).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        assert!(service.open(&URL_SAFE_NO_PAD.encode(bytes)).is_err());

        assert!(service.open("not base64 !!").is_err());
        assert!(service.open("AAAA").is_err());
    }

    #[test]
    fn empty_secret_is_a_config_error() {
        let err = EncryptionService::from_secret(b"", "oauth-state").unwrap_err();
        assert!(matches!(err, CommonError::Config { .. }));
    }
}
