//! Key material generation for new skills.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;
use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::pkcs8::{EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};
use wxa_core::{Result, WxaError};

/// Key size used when none is given.
pub const DEFAULT_KEY_BITS: usize = 4096;

/// Random bytes behind a generated skill secret.
pub const SECRET_BYTES: usize = 16;

/// A freshly generated RSA key pair in PEM form.
pub struct KeyPair {
    /// PKCS#1 `RSA PRIVATE KEY` block.
    pub private_pem: String,
    /// SPKI `PUBLIC KEY` block.
    pub public_pem: String,
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("private_pem", &"<redacted>")
            .field("public_pem", &self.public_pem)
            .finish()
    }
}

/// Generate an RSA key pair of `bits` bits.
pub fn generate_keypair(bits: usize) -> Result<KeyPair> {
    let private_key = RsaPrivateKey::new(&mut OsRng, bits)
        .map_err(|e| WxaError::KeyGeneration(e.to_string()))?;
    let public_key = RsaPublicKey::from(&private_key);

    let private_pem = private_key
        .to_pkcs1_pem(LineEnding::LF)
        .map_err(|e| WxaError::KeyGeneration(e.to_string()))?;
    let public_pem = public_key
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| WxaError::KeyGeneration(e.to_string()))?;

    Ok(KeyPair {
        private_pem: private_pem.to_string(),
        public_pem,
    })
}

/// Generate a skill secret: random bytes, URL-safe base64, no padding.
pub fn generate_secret() -> String {
    let mut buf = [0u8; SECRET_BYTES];
    OsRng.fill_bytes(&mut buf);
    URL_SAFE_NO_PAD.encode(buf)
}
