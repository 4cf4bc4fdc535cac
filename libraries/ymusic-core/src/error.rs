/// Core error types for the Yandex Music SDK
use thiserror::Error;

/// Result type alias using `MusicError`
pub type Result<T> = std::result::Result<T, MusicError>;

/// Core error type shared by SDK crates
#[derive(Error, Debug)]
pub enum MusicError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Authentication required but no token available
    #[error("Authentication required")]
    AuthRequired,

    /// The API answered with an error
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Response could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl MusicError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
