//! Album types

use super::{AlbumId, ArtistRef, Track};
use crate::serde_util::lenient_i64;
use serde::{Deserialize, Serialize};

/// Short album reference embedded in tracks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumRef {
    pub id: AlbumId,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

/// Full album
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: AlbumId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub year: Option<i32>,
    /// ISO-8601 release date
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub cover_uri: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub track_count: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub likes_count: i64,
    #[serde(default)]
    pub available: bool,
    /// `single`, `compilation`, ... absent for regular albums
    #[serde(default, rename = "type")]
    pub album_type: Option<String>,
    /// Tracks grouped by disc, only with `albums/{id}/with-tracks`
    #[serde(default)]
    pub volumes: Vec<Vec<Track>>,
}

impl Album {
    /// All tracks across volumes, in disc order
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.volumes.iter().flatten()
    }
}
