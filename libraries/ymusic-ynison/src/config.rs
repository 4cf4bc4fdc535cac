//! Sync client configuration.

use std::time::Duration;
use uuid::Uuid;

/// Redirector endpoint of the production service.
pub const DEFAULT_REDIRECTOR_URL: &str =
    "wss://ynison.music.yandex.ru/redirector.YnisonRedirectService/GetRedirectToYnison";

/// Origin sent with every handshake.
pub const DEFAULT_ORIGIN: &str = "https://music.yandex.ru";

/// Platform tag announced by the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DeviceType {
    #[default]
    Web,
    Android,
    Ios,
    SmartSpeaker,
    WebTv,
    AndroidTv,
    AppleTv,
}

impl DeviceType {
    /// Name used in the bootstrap device description.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Web => "WEB",
            Self::Android => "ANDROID",
            Self::Ios => "IOS",
            Self::SmartSpeaker => "SMART_SPEAKER",
            Self::WebTv => "WEB_TV",
            Self::AndroidTv => "ANDROID_TV",
            Self::AppleTv => "APPLE_TV",
        }
    }

    /// Numeric code used in the handshake metadata.
    pub fn code(self) -> u8 {
        match self {
            Self::Web => 1,
            Self::Android => 2,
            Self::Ios => 3,
            Self::SmartSpeaker => 4,
            Self::WebTv => 5,
            Self::AndroidTv => 6,
            Self::AppleTv => 7,
        }
    }
}

/// Who this client claims to be. Fixed for the life of a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub device_id: String,
    pub app_name: String,
    pub app_version: String,
    pub device_type: DeviceType,
    /// Human-readable name shown in other devices' device lists
    pub title: String,
}

impl DeviceIdentity {
    /// Identity with an explicit device id
    pub fn new(device_id: impl Into<String>, app_name: impl Into<String>) -> Self {
        let app_name = app_name.into();
        Self {
            device_id: device_id.into(),
            title: app_name.clone(),
            app_name,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            device_type: DeviceType::Web,
        }
    }

    /// Identity with a freshly generated device id
    pub fn generate(app_name: impl Into<String>) -> Self {
        Self::new(Uuid::new_v4().simple().to_string(), app_name)
    }

    #[must_use]
    pub fn app_version(mut self, version: impl Into<String>) -> Self {
        self.app_version = version.into();
        self
    }

    #[must_use]
    pub fn device_type(mut self, device_type: DeviceType) -> Self {
        self.device_type = device_type;
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

impl Default for DeviceIdentity {
    fn default() -> Self {
        Self::generate("ymusic")
    }
}

/// Connection settings.
#[derive(Debug, Clone)]
pub struct YnisonConfig {
    /// Control channel endpoint; its scheme is reused for the state channel
    pub redirector_url: String,
    pub origin: String,
    /// Upper bound for each websocket handshake
    pub handshake_timeout: Duration,
    /// How long `close` waits for the read loop before aborting it
    pub close_timeout: Duration,
    /// Buffered events per subscriber before slow subscribers lag
    pub event_capacity: usize,
}

impl YnisonConfig {
    /// Config pointing at a different redirector
    pub fn new(redirector_url: impl Into<String>) -> Self {
        Self {
            redirector_url: redirector_url.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    #[must_use]
    pub fn close_timeout(mut self, timeout: Duration) -> Self {
        self.close_timeout = timeout;
        self
    }

    #[must_use]
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }
}

impl Default for YnisonConfig {
    fn default() -> Self {
        Self {
            redirector_url: DEFAULT_REDIRECTOR_URL.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            handshake_timeout: Duration::from_secs(10),
            close_timeout: Duration::from_secs(5),
            event_capacity: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_type_codes() {
        assert_eq!(DeviceType::Web.code(), 1);
        assert_eq!(DeviceType::Web.as_str(), "WEB");
        assert_eq!(DeviceType::AppleTv.code(), 7);
    }

    #[test]
    fn generated_identity_has_id() {
        let a = DeviceIdentity::generate("test");
        let b = DeviceIdentity::generate("test");
        assert_eq!(a.device_id.len(), 32);
        assert_ne!(a.device_id, b.device_id);
        assert_eq!(a.title, "test");
    }

    #[test]
    fn event_capacity_never_zero() {
        let config = YnisonConfig::default().event_capacity(0);
        assert_eq!(config.event_capacity, 1);
    }
}
