use thiserror::Error;

/// Errors from the remote session API (used by trait definitions in parley-core).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("server returned HTTP {status}: {body}")]
    Server { status: u16, body: String },

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Status code for server failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors surfaced by cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to create session: {0}")]
    CreationFailed(#[source] ApiError),
}

/// Errors related to route parsing.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("path '{0}' has more than one segment")]
    TooManySegments(String),
}
