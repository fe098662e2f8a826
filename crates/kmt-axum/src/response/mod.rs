use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kmt_core::error::Error;

/// An HTTP rejection response.
#[derive(Debug)]
pub struct Rejection {
    /// Status code.
    status_code: StatusCode,
    /// Rejection cause.
    error: Error,
}

impl Rejection {
    /// Creates a `400 Bad Request` rejection.
    #[inline]
    pub fn bad_request(error: impl Into<Error>) -> Self {
        Self {
            status_code: StatusCode::BAD_REQUEST,
            error: error.into(),
        }
    }

    /// Creates a `500 Internal Server Error` rejection.
    #[inline]
    pub fn internal_server_error(error: impl Into<Error>) -> Self {
        Self {
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            error: error.into(),
        }
    }

    /// Returns the status code.
    #[inline]
    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }

    /// Returns the rejection cause.
    #[inline]
    pub fn error(&self) -> &Error {
        &self.error
    }
}

impl From<Error> for Rejection {
    #[inline]
    fn from(error: Error) -> Self {
        Self::bad_request(error)
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let status_code = self.status_code;
        let message = self.error.to_string();
        if status_code.is_server_error() {
            tracing::error!(status_code = status_code.as_u16(), "{message}");
            let reason = status_code.canonical_reason().unwrap_or_default();
            (status_code, reason).into_response()
        } else {
            tracing::warn!(status_code = status_code.as_u16(), "{message}");
            (status_code, message).into_response()
        }
    }
}
