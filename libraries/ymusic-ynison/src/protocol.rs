//! Handshake metadata and outgoing messages.

use crate::config::{DeviceIdentity, YnisonConfig};
use crate::error::{Result, YnisonError};
use crate::types::{Device, DeviceCapabilities, DeviceInfo, VersionMarker, VolumeInfo};
use serde::Serialize;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::header::{HeaderName, AUTHORIZATION, ORIGIN, SEC_WEBSOCKET_PROTOCOL};
use tokio_tungstenite::tungstenite::http::HeaderValue;
use url::Url;

/// Path of the state service on the host returned by the redirector.
pub const STATE_PATH: &str = "/ynison_state.YnisonStateService/PutYnisonState";

/// Subprotocols preceding the JSON metadata in `Sec-WebSocket-Protocol`.
const SUBPROTOCOL_PREFIX: &str = "Bearer, v2, ";

/// Directive telling the server not to move playback to this device.
pub const DO_NOT_INTERCEPT: &str = "DO_NOT_INTERCEPT_BY_DEFAULT";

#[derive(Serialize)]
struct ProtocolMetadata<'a> {
    #[serde(rename = "Ynison-Device-Id")]
    device_id: &'a str,
    #[serde(rename = "Ynison-Device-Info")]
    device_info: ProtocolDeviceInfo<'a>,
    #[serde(rename = "Ynison-Redirect-Ticket", skip_serializing_if = "Option::is_none")]
    redirect_ticket: Option<&'a str>,
}

#[derive(Serialize)]
struct ProtocolDeviceInfo<'a> {
    app_name: &'a str,
    #[serde(rename = "type")]
    device_type: u8,
}

/// Value of the `Sec-WebSocket-Protocol` header.
///
/// The redirect ticket is only present on the state channel.
pub fn subprotocol_header(identity: &DeviceIdentity, ticket: Option<&str>) -> Result<String> {
    let metadata = ProtocolMetadata {
        device_id: &identity.device_id,
        device_info: ProtocolDeviceInfo {
            app_name: &identity.app_name,
            device_type: identity.device_type.code(),
        },
        redirect_ticket: ticket,
    };
    Ok(format!(
        "{SUBPROTOCOL_PREFIX}{}",
        serde_json::to_string(&metadata)?
    ))
}

/// Build an upgrade request carrying auth, origin and device metadata.
pub fn build_request(
    url: &str,
    token: &str,
    config: &YnisonConfig,
    identity: &DeviceIdentity,
    ticket: Option<&str>,
) -> Result<Request> {
    let mut request = url
        .into_client_request()
        .map_err(|e| YnisonError::InvalidUrl(format!("{url}: {e}")))?;

    let headers = request.headers_mut();
    insert_header(headers, AUTHORIZATION, &format!("OAuth {token}"))?;
    insert_header(headers, ORIGIN, &config.origin)?;
    insert_header(
        headers,
        SEC_WEBSOCKET_PROTOCOL,
        &subprotocol_header(identity, ticket)?,
    )?;

    Ok(request)
}

fn insert_header(
    headers: &mut tokio_tungstenite::tungstenite::http::HeaderMap,
    name: HeaderName,
    value: &str,
) -> Result<()> {
    let value = HeaderValue::from_str(value)
        .map_err(|e| YnisonError::InvalidHeader(format!("{name}: {e}")))?;
    headers.insert(name, value);
    Ok(())
}

/// State channel URL for `host`, reusing the redirector's scheme.
pub fn state_url(redirector_url: &str, host: &str) -> Result<String> {
    let redirector =
        Url::parse(redirector_url).map_err(|e| YnisonError::InvalidUrl(e.to_string()))?;

    let scheme = match redirector.scheme() {
        "ws" => "ws",
        "wss" => "wss",
        other => {
            return Err(YnisonError::InvalidUrl(format!(
                "unsupported redirector scheme: {other}"
            )))
        }
    };

    let host = host.trim().trim_end_matches('/');
    if host.is_empty() || host.contains('/') {
        return Err(YnisonError::InvalidUrl(format!("invalid state host: {host:?}")));
    }

    Ok(format!("{scheme}://{host}{STATE_PATH}"))
}

// =============================================================================
// Bootstrap
// =============================================================================

/// First message on the state channel, announcing this device with a
/// baseline version for the queue and the status.
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapMessage {
    pub update_full_state: FullState,
    pub activity_interception_type: &'static str,
    pub player_action_timestamp_ms: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FullState {
    pub player_state: VersionedPlayerState,
    pub device: Device,
    pub is_currently_active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct VersionedPlayerState {
    pub player_queue: Versioned,
    pub status: Versioned,
}

#[derive(Debug, Clone, Serialize)]
pub struct Versioned {
    pub version: VersionMarker,
}

impl BootstrapMessage {
    pub fn new(identity: &DeviceIdentity, now_ms: i64) -> Self {
        let version = VersionMarker {
            device_id: identity.device_id.clone(),
            version: "0".to_string(),
            timestamp_ms: now_ms,
        };

        let device = Device {
            capabilities: Some(DeviceCapabilities {
                can_be_player: true,
                can_be_remote_controller: false,
                volume_granularity: 16,
            }),
            info: Some(DeviceInfo {
                device_id: identity.device_id.clone(),
                app_name: identity.app_name.clone(),
                app_version: identity.app_version.clone(),
                device_type: identity.device_type.as_str().to_string(),
                title: identity.title.clone(),
            }),
            volume_info: Some(VolumeInfo {
                volume: 0.0,
                version: None,
            }),
            is_shadow: true,
        };

        Self {
            update_full_state: FullState {
                player_state: VersionedPlayerState {
                    player_queue: Versioned {
                        version: version.clone(),
                    },
                    status: Versioned { version },
                },
                device,
                is_currently_active: false,
            },
            activity_interception_type: DO_NOT_INTERCEPT,
            player_action_timestamp_ms: now_ms,
        }
    }

    /// Bootstrap stamped with the current time
    pub fn now(identity: &DeviceIdentity) -> Self {
        Self::new(identity, chrono::Utc::now().timestamp_millis())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
