//! Error types for the sync client.

use crate::types::ServerError;
use std::fmt;
use thiserror::Error;
use tokio_tungstenite::tungstenite;
use ymusic_core::MusicError;

/// Step of the redirector handshake that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationStage {
    /// Building the upgrade request
    Request,
    /// Opening the control channel
    Dial,
    /// Waiting for the redirect message
    Read,
    /// Parsing the redirect message
    Decode,
}

impl fmt::Display for NegotiationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Request => "request",
            Self::Dial => "dial",
            Self::Read => "read",
            Self::Decode => "decode",
        })
    }
}

/// Errors surfaced by [`crate::YnisonClient`].
///
/// `connect` returns negotiation and channel-setup failures directly. Once
/// the client is active, channel and server failures arrive as
/// [`crate::SyncEvent::Closed`] instead.
#[derive(Error, Debug)]
pub enum YnisonError {
    /// Redirector handshake failed
    #[error("Negotiation failed at {stage}: {message}")]
    Negotiation {
        stage: NegotiationStage,
        message: String,
    },

    /// State channel could not be opened or written
    #[error("State channel error: {0}")]
    Channel(#[from] tungstenite::Error),

    /// Server sent a structured error frame
    #[error("Server error: {0}")]
    Server(ServerError),

    /// Handshake metadata cannot be carried in a header
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    /// Operation not allowed in the current connection state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Redirector URL or redirect host is unusable
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Outgoing message could not be encoded
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Track lookup for the current item failed
    #[error("Track resolution failed: {0}")]
    Resolve(#[from] MusicError),
}

impl YnisonError {
    pub(crate) fn negotiation(stage: NegotiationStage, message: impl fmt::Display) -> Self {
        Self::Negotiation {
            stage,
            message: message.to_string(),
        }
    }
}

/// Result type for sync client operations.
pub type Result<T> = std::result::Result<T, YnisonError>;
