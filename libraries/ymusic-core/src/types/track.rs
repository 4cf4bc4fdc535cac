//! Track types

use super::{AlbumRef, ArtistRef, TrackId};
use crate::serde_util::{lenient_i64, opt_string_or_number, string_or_number};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A track as returned by `tracks`, album volumes, search and playlists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: TrackId,
    /// Id of the original track when this one is a re-release
    #[serde(
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub real_id: Option<String>,
    #[serde(default)]
    pub title: String,
    /// Edition suffix such as "Remastered"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub duration_ms: i64,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub albums: Vec<AlbumRef>,
    #[serde(default)]
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_warning: Option<String>,
    #[serde(default)]
    pub lyrics_available: bool,
    /// `music`, `podcast-episode`, ...
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub track_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub file_size: i64,
}

impl Track {
    /// Key used by the download endpoints: `id:albumId`, or the bare id when
    /// the track belongs to no album
    pub fn key(&self) -> TrackKey {
        TrackKey {
            id: self.id.as_str().to_owned(),
            album_id: self.albums.first().map(|a| a.id.as_str().to_owned()),
        }
    }

    /// Comma-joined artist names
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Track/album pair, the `id:albumId` form accepted by download and playlist
/// endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackKey {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub album_id: Option<String>,
}

impl TrackKey {
    /// Create a key from a track id and an optional album id
    pub fn new(id: impl Into<String>, album_id: Option<String>) -> Self {
        Self {
            id: id.into(),
            album_id,
        }
    }
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.album_id {
            Some(album) => write!(f, "{}:{}", self.id, album),
            None => write!(f, "{}", self.id),
        }
    }
}

/// One downloadable variant of a track
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadInfo {
    /// `mp3` or `aac`
    pub codec: String,
    #[serde(default)]
    pub bitrate_in_kbps: u32,
    #[serde(default)]
    pub direct: bool,
    #[serde(default)]
    pub gain: bool,
    #[serde(default)]
    pub preview: bool,
    pub download_info_url: String,
}

/// Storage location answer from `downloadInfoUrl`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageFile {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub ts: String,
    #[serde(default)]
    pub s: String,
}

impl StorageFile {
    /// All four parts are needed to sign a link
    pub fn is_complete(&self) -> bool {
        !(self.host.is_empty() || self.path.is_empty() || self.ts.is_empty() || self.s.is_empty())
    }
}

/// `tracks/{id}/similar`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarTracks {
    #[serde(default)]
    pub track: Option<Track>,
    #[serde(default)]
    pub similar_tracks: Vec<Track>,
}

/// `tracks/{id}/supplement`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackSupplement {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub lyrics: Option<Lyrics>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Lyrics block of a supplement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lyrics {
    #[serde(default)]
    pub full_lyrics: String,
    #[serde(default)]
    pub has_rights: bool,
    #[serde(default)]
    pub text_language: Option<String>,
}
