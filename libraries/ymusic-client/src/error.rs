//! Error types for the Yandex Music HTTP client.

use thiserror::Error;
use ymusic_core::MusicError;

/// Errors that can occur when talking to the Yandex Music API.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response without a structured body
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Server returned a structured `{"error": {...}}` body
    #[error("API error {name}: {message}")]
    ApiError { name: String, message: String },

    /// Authentication required but no token available, or the token was rejected
    #[error("Authentication required")]
    AuthRequired,

    /// Token validation failed
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Requested entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Playlist was modified concurrently, re-read it and retry
    #[error("Playlist revision conflict: {0}")]
    RevisionConflict(String),

    /// Invalid base URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    /// Operation needs the account uid, call `account().status()` first
    #[error("Account uid unknown, fetch account status first")]
    MissingUid,

    /// Storage answer lacks host, path, ts or s
    #[error("Incomplete download info: {0}")]
    IncompleteDownloadInfo(String),

    /// Invalid argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

impl From<ClientError> for MusicError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::AuthRequired | ClientError::AuthFailed(_) | ClientError::MissingUid => {
                MusicError::AuthRequired
            }
            ClientError::NotFound(id) => MusicError::not_found("entity", id),
            ClientError::ServerError { status, message } => MusicError::Api { status, message },
            ClientError::ApiError { name, message } => MusicError::Api {
                status: 400,
                message: format!("{name}: {message}"),
            },
            ClientError::RevisionConflict(message) => MusicError::Api {
                status: 409,
                message,
            },
            ClientError::Request(e) => MusicError::network(e.to_string()),
            ClientError::ServerUnreachable(msg) => MusicError::network(msg),
            ClientError::ParseError(msg) | ClientError::IncompleteDownloadInfo(msg) => {
                MusicError::Parse(msg)
            }
            ClientError::InvalidUrl(msg) | ClientError::InvalidInput(msg) => {
                MusicError::invalid_input(msg)
            }
        }
    }
}
