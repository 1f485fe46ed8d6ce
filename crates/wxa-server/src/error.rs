use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use http_body_util::LengthLimitError;
use wxa_core::DecodeError;

/// A failed request, rendered as `{"error": "<message>"}`.
///
/// Messages are fixed strings or codec messages; cryptographic detail stays
/// in the logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub status: StatusCode,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn invalid_request() -> Self {
        Self::bad_request("invalid request")
    }

    pub fn invalid_signature() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "invalid signature")
    }

    pub fn undecryptable() -> Self {
        Self::bad_request("unable to decrypt message")
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }

    /// A failed body read: 413 when the size limit tripped, 400 otherwise.
    pub fn from_body_error(err: &axum::Error) -> Self {
        let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
        while let Some(e) = source {
            if e.is::<LengthLimitError>() {
                return DecodeError::TooLarge.into();
            }
            source = e.source();
        }
        Self::invalid_request()
    }
}

impl From<DecodeError> for ErrorResponse {
    fn from(err: DecodeError) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    // ── Body read failures ──

    #[tokio::test]
    async fn test_body_over_limit_is_413() {
        let err = axum::body::to_bytes(Body::from("0123456789"), 4)
            .await
            .unwrap_err();
        let resp = ErrorResponse::from_body_error(&err);
        assert_eq!(resp.status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_broken_body_is_400() {
        let err = axum::Error::new(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset",
        ));
        assert_eq!(
            ErrorResponse::from_body_error(&err),
            ErrorResponse::invalid_request()
        );
    }
}
