//! Network error types

/// Network result type
pub type Result<T> = std::result::Result<T, Error>;

/// Gateway errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connect failure, timeout or other transport-level problem
    #[error("Transport error: {0}")]
    Transport(String),

    /// Body did not have the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// HTTP 401
    #[error("Unauthorized")]
    Unauthorized,

    /// Any other non-2xx response
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Transport(format!("request timed out: {}", err))
        } else {
            Error::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }
}
