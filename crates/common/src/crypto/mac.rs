//! HMAC-SHA256 signing with constant-time verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::{CommonError, CommonResult};

type HmacSha256 = Hmac<Sha256>;

/// Compute the HMAC-SHA256 tag of `payload` under `secret`.
pub fn sign(secret: &[u8], payload: &[u8]) -> CommonResult<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|err| CommonError::internal_with_context(err.to_string(), "hmac"))?;
    mac.update(payload);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Check `tag` against the HMAC of `payload`.
///
/// A tag of the wrong length is rejected before comparison; equal-length tags
/// are compared in constant time.
pub fn verify(secret: &[u8], payload: &[u8], tag: &[u8]) -> CommonResult<bool> {
    let expected = sign(secret, payload)?;
    if expected.len() != tag.len() {
        return Ok(false);
    }
    Ok(expected.ct_eq(tag).into())
}
