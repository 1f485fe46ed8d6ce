//! Hybrid RSA-OAEP + Fernet envelopes.
//!
//! An envelope is `base64(rsa_oaep(fernet_key)) "." base64(fernet_token)`.
//! A fresh Fernet key is generated per message and wrapped under the skill's
//! RSA public key; only the holder of the private key can unwrap it.
//!
//! Fernet token timestamps are not checked: an authentic token decrypts
//! whatever its age and however far ahead of the local clock it was minted.
//! The wrapped Fernet key may use either base64 alphabet.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use fernet::Fernet;
use rand::rngs::OsRng;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use wxa_core::{EnvelopeError, Segment};

pub const PRIVATE_KEY_TAG: &str = "RSA PRIVATE KEY";
pub const PUBLIC_KEY_TAG: &str = "PUBLIC KEY";

/// "Now" for token checks; every timestamp a token can carry lies at or before it.
/// Stays clear of the library's clock-skew addition.
const TIMESTAMP_HORIZON: u64 = u64::MAX - 60;

/// Open an envelope with the skill's PKCS#1 private key.
pub fn decrypt(private_key_pem: &str, envelope: &str) -> Result<String, EnvelopeError> {
    let (wrapped_key, token) = split_envelope(envelope)?;

    let wrapped_key = decode_segment(Segment::Key, wrapped_key)?;
    let token = decode_segment(Segment::Token, token)?;

    let private_key = parse_private_key(private_key_pem)?;

    let fernet_key = private_key
        .decrypt(Oaep::new::<Sha256>(), &wrapped_key)
        .map_err(|_| EnvelopeError::KeyUnwrap)?;
    let fernet_key = std::str::from_utf8(&fernet_key).map_err(|_| EnvelopeError::SymmetricKey)?;
    let fernet = fernet_for_key(fernet_key)?;

    let token = std::str::from_utf8(&token).map_err(|_| EnvelopeError::SymmetricDecrypt)?;
    let plaintext = fernet
        .decrypt_at_time(token, None, TIMESTAMP_HORIZON)
        .map_err(|_| EnvelopeError::SymmetricDecrypt)?;

    String::from_utf8(plaintext).map_err(|_| EnvelopeError::Utf8)
}

/// Seal `plaintext` for the holder of the private key matching `public_key_pem`.
pub fn encrypt(public_key_pem: &str, plaintext: &str) -> Result<String, EnvelopeError> {
    let public_key = parse_public_key(public_key_pem)?;

    let fernet_key = Fernet::generate_key();
    let fernet = Fernet::new(&fernet_key).ok_or(EnvelopeError::SymmetricKey)?;
    let token = fernet.encrypt(plaintext.as_bytes());

    let wrapped_key = public_key
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), fernet_key.as_bytes())
        .map_err(|e| EnvelopeError::Encrypt(e.to_string()))?;

    Ok(format!(
        "{}.{}",
        STANDARD.encode(wrapped_key),
        STANDARD.encode(token)
    ))
}

/// Fernet keys are URL-safe base64; standard-alphabet keys are mapped across.
fn fernet_for_key(key: &str) -> Result<Fernet, EnvelopeError> {
    let key = key.trim().replace('+', "-").replace('/', "_");
    Fernet::new(&key).ok_or(EnvelopeError::SymmetricKey)
}

/// Parse a PKCS#1 `RSA PRIVATE KEY` PEM block.
pub fn parse_private_key(pem_text: &str) -> Result<RsaPrivateKey, EnvelopeError> {
    let der = pem_contents(pem_text, PRIVATE_KEY_TAG)?;
    RsaPrivateKey::from_pkcs1_der(&der).map_err(|e| EnvelopeError::KeyParse(e.to_string()))
}

/// Parse an SPKI `PUBLIC KEY` PEM block.
pub fn parse_public_key(pem_text: &str) -> Result<RsaPublicKey, EnvelopeError> {
    let der = pem_contents(pem_text, PUBLIC_KEY_TAG)?;
    RsaPublicKey::from_public_key_der(&der).map_err(|e| EnvelopeError::KeyParse(e.to_string()))
}

fn pem_contents(pem_text: &str, expected: &'static str) -> Result<Vec<u8>, EnvelopeError> {
    let block = pem::parse(pem_text).map_err(|e| EnvelopeError::Pem(e.to_string()))?;
    if block.tag() != expected {
        return Err(EnvelopeError::PemType {
            expected,
            found: block.tag().to_string(),
        });
    }
    Ok(block.contents().to_vec())
}

fn split_envelope(envelope: &str) -> Result<(&str, &str), EnvelopeError> {
    let parts: Vec<&str> = envelope.split('.').collect();
    match parts.as_slice() {
        [key, token] if !key.is_empty() && !token.is_empty() => Ok((*key, *token)),
        [_, _] => Err(EnvelopeError::SegmentCount {
            found: parts.iter().filter(|p| !p.is_empty()).count(),
        }),
        _ => Err(EnvelopeError::SegmentCount { found: parts.len() }),
    }
}

fn decode_segment(segment: Segment, data: &str) -> Result<Vec<u8>, EnvelopeError> {
    STANDARD.decode(data).map_err(|e| EnvelopeError::Base64 {
        segment,
        reason: e.to_string(),
    })
}
