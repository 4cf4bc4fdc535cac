//! Ynison wire model.
//!
//! Field names are snake_case as sent by the service. 64-bit integers arrive
//! either as JSON numbers or as strings, so every integer goes through the
//! lenient deserializers. Missing fields take their defaults.

use serde::{Deserialize, Serialize};
use std::fmt;
use ymusic_core::serde_util::{lenient_i64, string_or_number};

// =============================================================================
// Negotiation
// =============================================================================

/// Answer of the redirector: where to open the state channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RedirectInfo {
    /// Host (and optional port) serving the state channel
    #[serde(default)]
    pub host: String,
    /// Single-use credential binding this negotiation to the state channel
    #[serde(default)]
    pub redirect_ticket: String,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub keep_alive_params: Option<KeepAliveParams>,
}

/// Keepalive parameters advertised by the redirector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct KeepAliveParams {
    /// Ping interval, zero disables pings
    #[serde(default, deserialize_with = "lenient_i64")]
    pub keep_alive_time_seconds: i64,
    /// Upper bound for a single ping send, zero means unbounded
    #[serde(default, deserialize_with = "lenient_i64")]
    pub keep_alive_timeout_seconds: i64,
}

// =============================================================================
// Player state
// =============================================================================

/// Per-field version stamp the server uses to reconcile concurrent updates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionMarker {
    #[serde(default)]
    pub device_id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub version: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub timestamp_ms: i64,
}

/// Full state pushed by the server. Replaced wholesale on every frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    #[serde(default)]
    pub devices: Vec<DeviceFull>,
    #[serde(default)]
    pub player_state: Option<PlayerState>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub timestamp_ms: i64,
    /// Device currently playing, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_device_id_optional: Option<String>,
}

/// Queue and playback status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    #[serde(default)]
    pub player_queue: Option<PlayerQueue>,
    #[serde(default)]
    pub status: Option<PlayerStatus>,
}

/// The play queue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerQueue {
    /// Index into `playable_list`, may be out of range
    #[serde(default, deserialize_with = "lenient_i64")]
    pub current_playable_index: i64,
    #[serde(default)]
    pub entity_id: String,
    #[serde(default)]
    pub entity_type: String,
    #[serde(default)]
    pub entity_context: String,
    #[serde(default)]
    pub options: Option<QueueOptions>,
    #[serde(default)]
    pub playable_list: Vec<PlayableItem>,
    #[serde(default)]
    pub queue: Option<Queue>,
    #[serde(default)]
    pub from_optional: String,
    #[serde(default)]
    pub version: Option<VersionMarker>,
}

impl PlayerQueue {
    /// The item at `current_playable_index`, if the index is in range.
    pub fn current(&self) -> Option<&PlayableItem> {
        let index = usize::try_from(self.current_playable_index).ok()?;
        self.playable_list.get(index)
    }
}

/// Queue playback options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueOptions {
    /// `NONE`, `ONE` or `ALL`
    #[serde(default)]
    pub repeat_mode: String,
}

/// Extra queue kinds. Only the radio ("wave") queue exists today.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Queue {
    #[serde(default)]
    pub wave_queue: Option<WaveQueue>,
}

/// Radio queue state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveQueue {
    #[serde(default)]
    pub recommended_playable_list: Vec<PlayableItem>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub live_playable_index: i64,
    #[serde(default)]
    pub entity_options: Option<serde_json::Value>,
}

/// One queue entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayableItem {
    #[serde(default, deserialize_with = "string_or_number")]
    pub playable_id: String,
    /// `TRACK`, `LOCAL_TRACK`, `INFINITE`, ...
    #[serde(default)]
    pub playable_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_id_optional: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url_optional: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_info: Option<serde_json::Value>,
}

/// Playback status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatus {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub duration_ms: i64,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub playback_speed: f64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub progress_ms: i64,
    #[serde(default)]
    pub version: Option<VersionMarker>,
}

// =============================================================================
// Devices
// =============================================================================

/// Device as listed in a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceFull {
    #[serde(flatten)]
    pub device: Device,
    #[serde(default)]
    pub session: Option<DeviceSession>,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub is_offline: bool,
}

/// Device description, also sent in the bootstrap message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Device {
    #[serde(default)]
    pub capabilities: Option<DeviceCapabilities>,
    #[serde(default)]
    pub info: Option<DeviceInfo>,
    #[serde(default)]
    pub volume_info: Option<VolumeInfo>,
    #[serde(default)]
    pub is_shadow: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    #[serde(default)]
    pub device_id: String,
    #[serde(default)]
    pub app_name: String,
    #[serde(default)]
    pub app_version: String,
    #[serde(default, rename = "type")]
    pub device_type: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCapabilities {
    #[serde(default)]
    pub can_be_player: bool,
    #[serde(default)]
    pub can_be_remote_controller: bool,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub volume_granularity: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeInfo {
    #[serde(default)]
    pub volume: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionMarker>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSession {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
}

// =============================================================================
// Errors
// =============================================================================

/// Structured error frame. Terminal for the connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerError {
    #[serde(default)]
    pub message: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub grpc_code: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub http_code: i64,
    #[serde(default)]
    pub http_status: String,
    #[serde(default)]
    pub details: Option<ServerErrorDetails>,
}

/// Service-specific error detail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerErrorDetails {
    #[serde(default)]
    pub ynison_error_code: String,
    /// Suggested wait before reconnecting
    #[serde(default, deserialize_with = "lenient_i64")]
    pub ynison_backoff_millis: i64,
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if !self.http_status.is_empty() {
            write!(f, " ({} {})", self.http_code, self.http_status)?;
        }
        if let Some(details) = &self.details {
            if !details.ynison_error_code.is_empty() {
                write!(f, " [{}]", details.ynison_error_code)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn current_item_respects_bounds() {
        let mut queue = PlayerQueue {
            playable_list: vec![
                PlayableItem {
                    playable_id: "A".into(),
                    ..Default::default()
                },
                PlayableItem {
                    playable_id: "B".into(),
                    ..Default::default()
                },
            ],
            current_playable_index: 1,
            ..Default::default()
        };
        assert_eq!(queue.current().map(|p| p.playable_id.as_str()), Some("B"));

        queue.current_playable_index = 2;
        assert!(queue.current().is_none());
        queue.current_playable_index = -1;
        assert!(queue.current().is_none());
    }

    #[test]
    fn device_full_flattens_device() {
        let device: DeviceFull = serde_json::from_value(json!({
            "info": {"device_id": "d1", "type": "WEB", "title": "Browser"},
            "capabilities": {"can_be_player": true, "volume_granularity": "16"},
            "is_shadow": false,
            "session": {"id": 1234567890123_i64},
            "volume": 0.5
        }))
        .unwrap();

        assert_eq!(device.device.info.unwrap().device_type, "WEB");
        assert_eq!(device.device.capabilities.unwrap().volume_granularity, 16);
        assert_eq!(device.session.unwrap().id, "1234567890123");
    }

    #[test]
    fn server_error_display() {
        let err: ServerError = serde_json::from_value(json!({
            "message": "rate limited",
            "grpc_code": 8,
            "http_code": "429",
            "http_status": "Too Many Requests",
            "details": {"ynison_error_code": "TOO_MANY_REQUESTS", "ynison_backoff_millis": "3000"}
        }))
        .unwrap();

        assert_eq!(err.details.as_ref().unwrap().ynison_backoff_millis, 3000);
        assert_eq!(
            err.to_string(),
            "rate limited (429 Too Many Requests) [TOO_MANY_REQUESTS]"
        );
    }
}
