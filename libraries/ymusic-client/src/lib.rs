//! Yandex Music Client
//!
//! HTTP client library for the Yandex Music API.
//!
//! # Features
//!
//! - **Account**: token validation, uid discovery
//! - **Catalog**: tracks, albums, artists, search and suggestions
//! - **Downloads**: download variants and signed direct links
//! - **Library**: likes, dislikes, listening history
//! - **Playlists**: reads plus revision-checked edits
//! - **Resolver**: implements [`ymusic_core::TrackResolver`] for the sync client
//!
//! # Example
//!
//! ```ignore
//! use ymusic_client::{ClientConfig, MusicClient};
//! use ymusic_core::SearchType;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MusicClient::new(ClientConfig::with_token("AQAAAA..."))?;
//!
//!     let status = client.account().status().await?;
//!     println!("Logged in as {}", status.account.login);
//!
//!     let found = client.search().search("muse", SearchType::Track, 0, 10).await?;
//!     for track in found.tracks.map(|s| s.results).unwrap_or_default() {
//!         println!("{} - {}", track.artist_names(), track.title);
//!     }
//!
//!     let liked = client.library().liked_tracks().await?;
//!     println!("{} liked tracks", liked.keys().len());
//!
//!     Ok(())
//! }
//! ```

mod account;
mod albums;
mod artists;
mod client;
mod error;
mod library;
mod playlists;
mod request;
mod resolver;
mod search;
mod tracks;
mod types;

pub use client::MusicClient;
pub use error::{ClientError, Result};
pub use types::{ClientConfig, DEFAULT_BASE_URL};

// Re-export sub-clients for direct use if needed
pub use account::AccountClient;
pub use albums::AlbumsClient;
pub use artists::ArtistsClient;
pub use library::LibraryClient;
pub use playlists::PlaylistsClient;
pub use search::SearchClient;
pub use tracks::TracksClient;
