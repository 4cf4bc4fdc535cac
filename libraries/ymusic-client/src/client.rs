//! Main Yandex Music client.

use crate::account::AccountClient;
use crate::albums::AlbumsClient;
use crate::artists::ArtistsClient;
use crate::error::{ClientError, Result};
use crate::library::LibraryClient;
use crate::playlists::PlaylistsClient;
use crate::search::SearchClient;
use crate::tracks::TracksClient;
use crate::types::{ClientConfig, Session};
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Main client for the Yandex Music API.
///
/// Holds the HTTP connection pool and the authentication state, and hands
/// out borrowing sub-clients per API area. Cloning is cheap and clones share
/// the same session.
///
/// # Example
///
/// ```ignore
/// use ymusic_client::{ClientConfig, MusicClient};
///
/// let client = MusicClient::new(ClientConfig::with_token("AQAAAA..."))?;
/// let status = client.account().status().await?;
/// println!("Logged in as {}", status.account.login);
///
/// let tracks = client.tracks().get(&["3348297"]).await?;
/// println!("{}", tracks[0].title);
/// ```
#[derive(Clone)]
pub struct MusicClient {
    pub(crate) http: Client,
    pub(crate) base_url: String,
    device_id: String,
    pub(crate) session: Arc<RwLock<Session>>,
}

impl MusicClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let base_url = config.url.trim_end_matches('/').to_string();
        let parsed =
            url::Url::parse(&base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let device_id = config
            .device_id
            .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(std::time::Duration::from_secs(10))
            .user_agent(config.user_agent)
            .gzip(true)
            .build()?;

        Ok(Self {
            http,
            base_url,
            device_id,
            session: Arc::new(RwLock::new(Session {
                token: config.token,
                ..Session::default()
            })),
        })
    }

    /// Get the API base URL.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Device id sent with every request.
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Current OAuth token.
    pub async fn token(&self) -> Option<String> {
        self.session.read().await.token.clone()
    }

    /// Replace the OAuth token. The cached account identity is dropped.
    pub async fn set_token(&self, token: Option<String>) {
        let mut session = self.session.write().await;
        session.token = token;
        session.uid = None;
        session.login = None;
    }

    /// Check if the client has a token.
    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.token.is_some()
    }

    /// Account uid, known after a successful `account().status()`.
    pub async fn uid(&self) -> Option<String> {
        self.session.read().await.uid.clone()
    }

    /// Account login, known after a successful `account().status()`.
    pub async fn login(&self) -> Option<String> {
        self.session.read().await.login.clone()
    }

    pub(crate) async fn require_uid(&self) -> Result<String> {
        self.session
            .read()
            .await
            .uid
            .clone()
            .ok_or(ClientError::MissingUid)
    }

    pub(crate) async fn remember_account(&self, uid: String, login: String) {
        let mut session = self.session.write().await;
        info!(uid = %uid, login = %login, "Account identified");
        session.uid = Some(uid);
        session.login = Some(login);
    }

    /// Account operations.
    pub fn account(&self) -> AccountClient<'_> {
        AccountClient::new(self)
    }

    /// Track lookups and download links.
    pub fn tracks(&self) -> TracksClient<'_> {
        TracksClient::new(self)
    }

    /// Album lookups.
    pub fn albums(&self) -> AlbumsClient<'_> {
        AlbumsClient::new(self)
    }

    /// Artist lookups.
    pub fn artists(&self) -> ArtistsClient<'_> {
        ArtistsClient::new(self)
    }

    /// Search and suggestions.
    pub fn search(&self) -> SearchClient<'_> {
        SearchClient::new(self)
    }

    /// Likes, dislikes and listening history of the current account.
    pub fn library(&self) -> LibraryClient<'_> {
        LibraryClient::new(self)
    }

    /// Playlist reads and revision-checked edits.
    pub fn playlists(&self) -> PlaylistsClient<'_> {
        PlaylistsClient::new(self)
    }
}

impl std::fmt::Debug for MusicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MusicClient")
            .field("base_url", &self.base_url)
            .field("device_id", &self.device_id)
            .finish_non_exhaustive()
    }
}
