//! Error types for MedBook Core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered but refused the request; retrying unchanged will
    /// not help
    #[error("Server rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected response shape: {0}")]
    Decode(String),

    #[error("Validation failed: {reason}")]
    Validation { fields: Vec<String>, reason: String },

    #[error("Authentication required")]
    AuthRequired,

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("A booking request is already in progress")]
    AlreadyInProgress,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Validation failure naming the offending form fields
    pub fn missing_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        let reason = format!("missing or invalid fields: {}", fields.join(", "));
        Error::Validation { fields, reason }
    }

    /// Short machine-readable kind, used for failure display and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Network(_) => "network",
            Error::Rejected { .. } => "rejected",
            Error::Decode(_) => "decode",
            Error::Validation { .. } => "validation",
            Error::AuthRequired => "auth_required",
            Error::InvalidCredentials(_) => "invalid_credentials",
            Error::InvalidState(_) => "invalid_state",
            Error::AlreadyInProgress => "already_in_progress",
            Error::NotFound(_) => "not_found",
            Error::Config(_) => "config",
            Error::Database(_) => "database",
            Error::Io(_) => "io",
            Error::Serialization(_) => "serialization",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
