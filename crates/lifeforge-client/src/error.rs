#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("API_HOST (or VITE_API_HOST) is not set")]
    MissingBaseUrl,

    #[error("Request failed: {0}")]
    Http(String),

    /// Non-2xx response; `message` is the server's `error` field.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to encode input: {0}")]
    Encode(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The route does not exist on the server.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
