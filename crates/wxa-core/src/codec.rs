//! Strict JSON request-body decoding.
//!
//! Every failure is classified into a [`DecodeError`] so the HTTP layer can
//! answer with a precise status and a message that is safe to show the caller.

use serde::de::DeserializeOwned;
use serde_json::error::Category;

use crate::error::DecodeError;

/// Upper bound on an accepted request body.
pub const MAX_BODY_BYTES: usize = 1_048_576;

const JSON_MEDIA_TYPE: &str = "application/json";

/// Decode a JSON body into `T`, classifying every failure.
///
/// `content_type` is the raw `Content-Type` header value, if the request had
/// one. Types that derive `deny_unknown_fields` get unknown-field rejection.
pub fn decode_json_body<T: DeserializeOwned>(
    content_type: Option<&str>,
    body: &[u8],
) -> Result<T, DecodeError> {
    if let Some(ct) = content_type {
        if !is_json_media_type(ct) {
            return Err(DecodeError::UnsupportedMediaType);
        }
    }

    if body.len() > MAX_BODY_BYTES {
        return Err(DecodeError::TooLarge);
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(DecodeError::Empty);
    }

    let mut de = serde_json::Deserializer::from_slice(body);
    let value: T = serde_path_to_error::deserialize(&mut de).map_err(|err| {
        let path = err.path().to_string();
        classify(body, path, err.into_inner())
    })?;

    if de.end().is_err() {
        return Err(DecodeError::MultipleValues);
    }

    Ok(value)
}

/// Media type comparison ignoring parameters and case.
fn is_json_media_type(header: &str) -> bool {
    let media_type = header.split(';').next().unwrap_or_default().trim();
    media_type.eq_ignore_ascii_case(JSON_MEDIA_TYPE)
}

fn classify(body: &[u8], path: String, err: serde_json::Error) -> DecodeError {
    let offset = byte_offset(body, err.line(), err.column());
    match err.classify() {
        Category::Eof => DecodeError::Truncated,
        Category::Syntax | Category::Io => DecodeError::Syntax { offset },
        Category::Data => {
            let msg = err.to_string();
            if msg.starts_with("unknown field") {
                DecodeError::UnknownField {
                    field: backticked(&msg).unwrap_or(path),
                }
            } else if msg.starts_with("missing field") {
                DecodeError::MissingField {
                    field: backticked(&msg).unwrap_or(path),
                }
            } else {
                DecodeError::InvalidType {
                    field: path,
                    offset,
                }
            }
        }
    }
}

/// First `` `quoted` `` token in a serde error message.
fn backticked(msg: &str) -> Option<String> {
    let start = msg.find('`')? + 1;
    let len = msg[start..].find('`')?;
    Some(msg[start..start + len].to_string())
}

/// Convert serde_json's 1-based line/column into a byte offset.
fn byte_offset(body: &[u8], line: usize, column: usize) -> usize {
    if line <= 1 {
        return column;
    }
    let line_start = body
        .iter()
        .enumerate()
        .filter(|(_, b)| **b == b'\n')
        .nth(line - 2)
        .map(|(i, _)| i + 1)
        .unwrap_or(0);
    line_start + column
}
