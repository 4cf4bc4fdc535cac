//! Playlist types and the revision-checked change diff

use super::{Track, TrackKey};
use crate::serde_util::{lenient_i64, string_or_number};
use serde::{Deserialize, Serialize};

/// A user playlist
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Playlist number within the owner's collection
    #[serde(default, deserialize_with = "string_or_number")]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub playlist_uuid: Option<String>,
    #[serde(default)]
    pub owner: Option<Owner>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub track_count: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub duration_ms: i64,
    /// Optimistic concurrency token for `change`
    #[serde(default, deserialize_with = "lenient_i64")]
    pub revision: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub snapshot: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub likes_count: i64,
    #[serde(default)]
    pub visibility: Option<String>,
    /// ISO-8601 creation time
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub generated_playlist_type: Option<String>,
    #[serde(default)]
    pub tracks: Vec<TrackContainer>,
}

impl Playlist {
    /// Uid of the owner, empty if the payload omitted it
    pub fn owner_uid(&self) -> &str {
        self.owner.as_ref().map_or("", |o| o.uid.as_str())
    }

    /// `uid:kind`, the form accepted by `playlists/list`
    pub fn key(&self) -> PlaylistKey {
        PlaylistKey::new(self.owner_uid(), self.kind.clone())
    }
}

/// Playlist owner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Owner {
    #[serde(default, deserialize_with = "string_or_number")]
    pub uid: String,
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub name: String,
}

/// Owner uid plus playlist kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PlaylistKey {
    pub uid: String,
    pub kind: String,
}

impl PlaylistKey {
    /// Create a key
    pub fn new(uid: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            kind: kind.into(),
        }
    }
}

impl std::fmt::Display for PlaylistKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.uid, self.kind)
    }
}

/// Playlist entry: the track id, and the track itself when expanded
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackContainer {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub track: Option<Track>,
    /// ISO-8601 time the entry was added
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Operation kind of a playlist diff entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeOperation {
    Insert,
    Delete,
}

/// One entry of the `diff` form field sent to `playlists/{kind}/change`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistChange {
    pub op: ChangeOperation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tracks: Vec<TrackKey>,
}

impl PlaylistChange {
    /// Insert `tracks` at position `at`
    pub fn insert(at: usize, tracks: Vec<TrackKey>) -> Self {
        Self {
            op: ChangeOperation::Insert,
            at: Some(at),
            from: None,
            to: None,
            tracks,
        }
    }

    /// Delete the range `[from, to)`, naming the tracks expected there
    pub fn delete(from: usize, to: usize, tracks: Vec<TrackKey>) -> Self {
        Self {
            op: ChangeOperation::Delete,
            at: None,
            from: Some(from),
            to: Some(to),
            tracks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn change_diff_wire_shape() {
        let diff = vec![
            PlaylistChange::insert(0, vec![TrackKey::new("1", Some("10".into()))]),
            PlaylistChange::delete(3, 4, vec![TrackKey::new("2", None)]),
        ];

        assert_eq!(
            serde_json::to_value(&diff).unwrap(),
            json!([
                {"op": "insert", "at": 0, "tracks": [{"id": "1", "albumId": "10"}]},
                {"op": "delete", "from": 3, "to": 4, "tracks": [{"id": "2"}]}
            ])
        );
    }

    #[test]
    fn playlist_key_uses_owner_uid() {
        let playlist: Playlist = serde_json::from_value(json!({
            "kind": 1003,
            "title": "Road",
            "revision": 7,
            "owner": {"uid": 503646255, "login": "someone"}
        }))
        .unwrap();

        assert_eq!(playlist.key().to_string(), "503646255:1003");
        assert_eq!(playlist.revision, 7);
    }
}
