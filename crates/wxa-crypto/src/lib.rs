//! # wxa-crypto
//!
//! The secure message envelope: HMAC-SHA256 signatures over the raw envelope
//! string, and hybrid RSA-OAEP(SHA-256) + Fernet encryption of the payload.
//! Every call builds its own key objects, so nothing here holds state.

pub mod hybrid;
pub mod keys;
pub mod signature;

pub use hybrid::{decrypt, encrypt};
pub use keys::{DEFAULT_KEY_BITS, KeyPair, generate_keypair, generate_secret};
pub use signature::{sign, sign_base64, verify, verify_base64};
