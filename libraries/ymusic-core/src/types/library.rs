//! Likes, dislikes and listening history

use super::{Playlist, TrackKey};
use crate::serde_util::{lenient_i64, string_or_number};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which list under `users/{uid}/...`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryList {
    Likes,
    Dislikes,
}

impl LibraryList {
    /// Path segment
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Likes => "likes",
            Self::Dislikes => "dislikes",
        }
    }
}

/// Entity section of a library list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibrarySection {
    Tracks,
    Albums,
    Artists,
    Playlists,
}

impl LibrarySection {
    /// Path segment
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tracks => "tracks",
            Self::Albums => "albums",
            Self::Artists => "artists",
            Self::Playlists => "playlists",
        }
    }

    /// Form field for add/remove: `track-ids`, `album-ids`, ...
    pub fn ids_field(self) -> &'static str {
        match self {
            Self::Tracks => "track-ids",
            Self::Albums => "album-ids",
            Self::Artists => "artist-ids",
            Self::Playlists => "playlist-ids",
        }
    }
}

/// `users/{uid}/likes/tracks`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LikedTracks {
    #[serde(default)]
    pub library: Option<LikedTracksLibrary>,
}

impl LikedTracks {
    /// Keys of the liked tracks, newest first as served
    pub fn keys(&self) -> Vec<TrackKey> {
        self.library
            .as_ref()
            .map(|lib| {
                lib.tracks
                    .iter()
                    .map(|t| TrackKey::new(t.id.clone(), t.album_id.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Body of [`LikedTracks`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedTracksLibrary {
    #[serde(default, deserialize_with = "string_or_number")]
    pub uid: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub revision: i64,
    #[serde(default)]
    pub playlist_uuid: Option<String>,
    #[serde(default)]
    pub tracks: Vec<LikedItem>,
}

/// Liked entity reference
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedItem {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Entry of `users/{uid}/likes/playlists`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LikedPlaylist {
    #[serde(default)]
    pub playlist: Playlist,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Context type of a listening history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayContextType {
    Album,
    Artist,
    Playlist,
    #[serde(other)]
    Other,
}

impl fmt::Display for PlayContextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Album => "album",
            Self::Artist => "artist",
            Self::Playlist => "playlist",
            Self::Other => "other",
        })
    }
}

/// `users/{uid}/contexts`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentlyListenedContexts {
    #[serde(default)]
    pub contexts: Vec<RecentlyListened>,
    #[serde(default)]
    pub other_tracks: Vec<ListenedTrack>,
}

/// One listening context
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentlyListened {
    #[serde(default)]
    pub client: Option<String>,
    pub context: PlayContextType,
    #[serde(default, deserialize_with = "string_or_number")]
    pub context_item: String,
    #[serde(default)]
    pub tracks: Vec<ListenedTrack>,
}

/// A track inside a listening context
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenedTrack {
    pub track_id: TrackKey,
    #[serde(default)]
    pub time_stamp: Option<String>,
}
