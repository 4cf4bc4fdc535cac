//! Client configuration.

use std::time::Duration;

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.music.yandex.net";

/// Configuration for a [`crate::MusicClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "https://api.music.yandex.net")
    pub url: String,
    /// OAuth token (if authenticated)
    pub token: Option<String>,
    /// Stable device id sent as `X-Yandex-Music-Device`, generated when absent
    pub device_id: Option<String>,
    /// `User-Agent` header
    pub user_agent: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a config pointing at `url` with no token.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Create a config for the public API with an OAuth token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Override the device id.
    #[must_use]
    pub fn device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_BASE_URL.to_string(),
            token: None,
            device_id: None,
            user_agent: format!("ymusic-rs/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(15),
        }
    }
}

/// Authentication state held by the client.
#[derive(Debug, Clone, Default)]
pub(crate) struct Session {
    pub token: Option<String>,
    pub uid: Option<String>,
    pub login: Option<String>,
}
