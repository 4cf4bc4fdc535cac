//! Yandex Music Core
//!
//! Shared domain types, traits, and error handling for the Yandex Music SDK.
//!
//! This crate is used by both the HTTP client (`ymusic-client`) and the
//! realtime player-state sync client (`ymusic-ynison`).
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Album`, `Artist`, `Playlist`, search and library models
//! - **Response Envelope**: `Response<T>` wrapping every API payload
//! - **Core Traits**: `TrackResolver`, the single capability the sync client consumes
//! - **Error Handling**: Unified `MusicError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use ymusic_core::types::{Response, Track};
//!
//! let json = r#"{"result": {"id": 3348297, "title": "Uprising", "durationMs": "304000"}}"#;
//! let response: Response<Track> = serde_json::from_str(json).unwrap();
//!
//! assert_eq!(response.result.id.as_str(), "3348297");
//! assert_eq!(response.result.duration_ms, 304_000);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod serde_util;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{MusicError, Result};
pub use traits::TrackResolver;

pub use types::{
    // Envelope
    ApiErrorBody, InvocationInfo, Pager, Response, Revision,
    // Ids
    AlbumId, ArtistId, TrackId,
    // Catalog
    Album, AlbumRef, Artist, ArtistBriefInfo, ArtistCounts, ArtistRef, Track, TrackKey,
    TracksPage,
    // Playlists
    ChangeOperation, Playlist, PlaylistChange, TrackContainer,
    // Search
    SearchResults, SearchSection, SearchType, Suggestions,
    // Library
    LibraryList, LibrarySection, LikedTracks, PlayContextType, RecentlyListenedContexts,
    // Account
    AccountStatus,
};
