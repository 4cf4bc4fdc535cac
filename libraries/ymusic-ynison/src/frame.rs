//! Classification of inbound state-channel frames.

use crate::types::{PlayerSnapshot, ServerError};
use serde_json::Value;

/// What an inbound payload turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Error envelope with a populated `error`
    ServerError(ServerError),
    /// State frame with a populated `player_state`
    Snapshot(PlayerSnapshot),
    /// Valid JSON of another shape (device-only updates and the like)
    Unrecognized,
}

/// Why a payload could not be classified at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndecodableFrame(pub String);

impl Frame {
    /// Classify a payload. The error shape wins over the snapshot shape.
    pub fn decode(payload: &[u8]) -> Result<Self, UndecodableFrame> {
        let value: Value =
            serde_json::from_slice(payload).map_err(|e| UndecodableFrame(e.to_string()))?;

        if let Some(error) = value.get("error").filter(|e| !e.is_null()) {
            let error: ServerError = serde_json::from_value(error.clone())
                .map_err(|e| UndecodableFrame(e.to_string()))?;
            return Ok(Self::ServerError(error));
        }

        if value.get("player_state").is_some_and(|s| !s.is_null()) {
            let snapshot: PlayerSnapshot =
                serde_json::from_value(value).map_err(|e| UndecodableFrame(e.to_string()))?;
            return Ok(Self::Snapshot(snapshot));
        }

        Ok(Self::Unrecognized)
    }
}
