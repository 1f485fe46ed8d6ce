//! HMAC-SHA256 message signatures.
//!
//! The assistant platform signs the raw envelope string with the skill's
//! shared secret and sends the digest base64-encoded alongside it.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use wxa_core::{Result, WxaError};

type HmacSha256 = Hmac<Sha256>;

/// Raw HMAC-SHA256 digest of `payload` under `secret`.
pub fn sign(secret: &[u8], payload: &str) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

/// Standard-base64 signature, as carried in a signed request.
pub fn sign_base64(secret: &[u8], payload: &str) -> String {
    STANDARD.encode(sign(secret, payload))
}

/// Check `candidate` against the digest of `payload`.
///
/// Comparison is constant-time; a length mismatch is simply `false`.
pub fn verify(secret: &[u8], payload: &str, candidate: &[u8]) -> bool {
    let mut mac = match HmacSha256::new_from_slice(secret) {
        Ok(m) => m,
        Err(_) => return false,
    };
    mac.update(payload.as_bytes());
    let expected = mac.finalize().into_bytes();

    expected.as_slice().ct_eq(candidate).into()
}

/// Decode a base64 signature and verify it.
///
/// Undecodable input is an error rather than a mismatch, so callers can tell
/// garbage apart from a wrong secret.
pub fn verify_base64(secret: &[u8], payload: &str, encoded: &str) -> Result<bool> {
    let candidate = STANDARD
        .decode(encoded)
        .map_err(|e| WxaError::InvalidSignatureEncoding(e.to_string()))?;
    Ok(verify(secret, payload, &candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 4231 test case 2
    #[test]
    fn test_rfc4231_vector() {
        let digest = sign(b"Jefe", "what do ya want for nothing?");
        let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        assert_eq!(
            hex,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_truncated_candidate_rejected() {
        let digest = sign(b"k", "payload");
        assert!(!verify(b"k", "payload", &digest[..31]));
        assert!(!verify(b"k", "payload", &[]));
    }
}
