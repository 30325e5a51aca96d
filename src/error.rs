//! Error types with HTTP status code mapping.
//!
//! The access-control core (`authz`, `visibility`) never constructs these
//! directly; it returns decision values. Handlers translate a `Deny` into
//! one of the 401/403 variants here, and a failed visibility check into
//! `NotFound`, which doubles as the existence-masking response for hidden
//! resources.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};

/// Error type for lectern operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Authorization outcomes
    #[error("Authentication required")]
    NotAuthenticated,

    #[error("Only instructors may create courses or lessons")]
    NotTeacher,

    #[error("Only the course owner may modify this")]
    NotOwner,

    #[error("Lessons may only be added to courses you own")]
    NotCourseOwner,

    // Data errors
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    // System errors
    #[error("Invalid address: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Time error: {0}")]
    Time(#[from] jiff::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map error to HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::NotAuthenticated => StatusCode::UNAUTHORIZED,
            Error::NotTeacher | Error::NotOwner | Error::NotCourseOwner => StatusCode::FORBIDDEN,

            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::ValidationFailed(_) | Error::AddrParse(_) => StatusCode::BAD_REQUEST,

            // Config errors -> 500 (shouldn't happen at runtime)
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,

            // System errors -> 500
            Error::Io(_)
            | Error::Json(_)
            | Error::Database(_)
            | Error::Jwt(_)
            | Error::Time(_)
            | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert error into HTTP response.
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!("Internal error: {self}");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        let body = serde_json::json!({
            "error": message
        });

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap()
    }
}

/// Result type alias using lectern's Error.
pub type Result<T> = std::result::Result<T, Error>;
