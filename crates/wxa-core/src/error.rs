use std::fmt;
use thiserror::Error;

/// Unified error type for the wxa toolkit.
#[derive(Error, Debug)]
pub enum WxaError {
    // ── Envelope errors ────────────────────────────────────────
    #[error("envelope error: {0}")]
    Envelope(#[from] EnvelopeError),

    #[error("invalid signature")]
    InvalidSignature,

    #[error("error decoding signature: {0}")]
    InvalidSignatureEncoding(String),

    // ── Schema errors ──────────────────────────────────────────
    #[error("malformed request: {0}")]
    Decode(#[from] DecodeError),

    // ── Skills service errors ──────────────────────────────────
    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("http error: {0}")]
    Http(String),

    // ── Config errors ──────────────────────────────────────────
    #[error("config error: {0}")]
    Config(String),

    #[error("missing required environment variables or files for {0}")]
    MissingSkillKeys(String),

    // ── Key material ───────────────────────────────────────────
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    // ── Server errors ──────────────────────────────────────────
    #[error("server error: {0}")]
    Server(String),

    // ── Generic wrappers ───────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, WxaError>;

/// Which half of a secure envelope an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// The RSA-wrapped symmetric key.
    Key,
    /// The symmetric-cipher token carrying the payload.
    Token,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key => f.write_str("key"),
            Segment::Token => f.write_str("token"),
        }
    }
}

/// Failures while opening or sealing a secure envelope.
///
/// Every variant is terminal. Format variants describe input that could never
/// decrypt; the remaining variants are cryptographic failures and must be
/// reported to the remote side without detail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("envelope must contain exactly two non-empty segments, found {found}")]
    SegmentCount { found: usize },

    #[error("error decoding {segment}: {reason}")]
    Base64 { segment: Segment, reason: String },

    #[error("error decoding pem: {0}")]
    Pem(String),

    #[error("unexpected pem block type: expected {expected:?}, found {found:?}")]
    PemType {
        expected: &'static str,
        found: String,
    },

    #[error("error parsing key: {0}")]
    KeyParse(String),

    #[error("error decrypting symmetric key")]
    KeyUnwrap,

    #[error("error decoding symmetric key")]
    SymmetricKey,

    #[error("error decrypting payload")]
    SymmetricDecrypt,

    #[error("decrypted payload is not valid utf-8")]
    Utf8,

    #[error("error encrypting: {0}")]
    Encrypt(String),
}

impl EnvelopeError {
    /// Malformed input: wrong segment count, bad base64, bad or mismatched PEM.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            EnvelopeError::SegmentCount { .. }
                | EnvelopeError::Base64 { .. }
                | EnvelopeError::Pem(_)
                | EnvelopeError::PemType { .. }
                | EnvelopeError::KeyParse(_)
        )
    }

    /// Well-formed input that failed to authenticate or decrypt.
    pub fn is_decryption_failure(&self) -> bool {
        matches!(
            self,
            EnvelopeError::KeyUnwrap
                | EnvelopeError::SymmetricKey
                | EnvelopeError::SymmetricDecrypt
                | EnvelopeError::Utf8
        )
    }
}

/// Classified JSON request-body decode failures.
///
/// Messages are safe to return to the client; they never include body content
/// beyond a field name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Content-Type header is not application/json")]
    UnsupportedMediaType,

    #[error("Request body must not be larger than 1MB")]
    TooLarge,

    #[error("Request body must not be empty")]
    Empty,

    #[error("Request body contains badly-formed JSON (at position {offset})")]
    Syntax { offset: usize },

    #[error("Request body contains badly-formed JSON")]
    Truncated,

    #[error("Request body contains an invalid value for the {field:?} field (at position {offset})")]
    InvalidType { field: String, offset: usize },

    #[error("Request body contains unknown field {field:?}")]
    UnknownField { field: String },

    #[error("Request body is missing the {field:?} field")]
    MissingField { field: String },

    #[error("Request body must only contain a single JSON object")]
    MultipleValues,
}

impl DecodeError {
    /// HTTP status this failure should be reported with.
    pub fn status_code(&self) -> u16 {
        match self {
            DecodeError::UnsupportedMediaType => 415,
            DecodeError::TooLarge => 413,
            _ => 400,
        }
    }
}

/// Error kinds returned by the skills-service REST API.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    #[error("api: bad request")]
    BadRequest,

    #[error("api: unauthorized request")]
    Unauthorized,

    #[error("api: forbidden")]
    Forbidden,

    #[error("api: resource not found")]
    NotFound,

    #[error("api: internal error")]
    Internal,

    #[error("api: unexpected error occurred (status {0})")]
    Unknown(u16),
}

impl ApiError {
    /// Map a non-success HTTP status to its error kind.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ApiError::BadRequest,
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound,
            500 => ApiError::Internal,
            other => ApiError::Unknown(other),
        }
    }
}
