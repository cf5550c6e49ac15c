//! Core error type for LifeForge.
//!
//! `ServerError` is used throughout the core domain (stores, routes, etc.).
//! Variants split into two kinds:
//!
//! - **client errors** (`BadRequest`, `NotFound`, `Unauthorized`, `Conflict`):
//!   user input or business-rule violations, message is returned verbatim.
//! - **internal errors** (`Database`, `Internal`): logged server side, the
//!   caller only ever sees [`INTERNAL_ERROR_MESSAGE`].
//!
//! When the `axum` feature is enabled, it also implements `IntoResponse`
//! so it can be used directly as an axum handler error type.

/// Message returned to callers in place of internal error details.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Whether the message is safe to show to the caller.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ServerError::Database(_) | ServerError::Internal(_))
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ServerError::BadRequest(_) => 400,
            ServerError::Unauthorized(_) => 401,
            ServerError::NotFound(_) => 404,
            ServerError::Conflict(_) => 409,
            ServerError::Database(_) | ServerError::Internal(_) => 500,
        }
    }

    /// The message that goes over the wire.
    ///
    /// Client errors carry their own message, internal errors are replaced
    /// by [`INTERNAL_ERROR_MESSAGE`].
    pub fn public_message(&self) -> String {
        match self {
            ServerError::BadRequest(msg)
            | ServerError::NotFound(msg)
            | ServerError::Unauthorized(msg)
            | ServerError::Conflict(msg) => msg.clone(),
            ServerError::Database(_) | ServerError::Internal(_) => {
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// axum integration (opt-in via feature flag)
// ---------------------------------------------------------------------------

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        if !self.is_client_error() {
            tracing::error!(error = %self, "internal error while handling request");
        }

        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = serde_json::json!({ "error": self.public_message() });
        (status, axum::Json(body)).into_response()
    }
}
