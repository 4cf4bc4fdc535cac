//! Playlist reads and revision-checked edits.
//!
//! Edits go through `users/{uid}/playlists/{kind}/change` with the playlist
//! revision the caller last saw. A stale revision yields
//! [`ClientError::RevisionConflict`]; the caller re-reads and retries.

use crate::client::MusicClient;
use crate::error::{ClientError, Result};
use crate::request::join_ids;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info};
use ymusic_core::types::PlaylistKey;
use ymusic_core::{Playlist, PlaylistChange, TrackKey};

/// Playlists client.
pub struct PlaylistsClient<'a> {
    client: &'a MusicClient,
}

impl<'a> PlaylistsClient<'a> {
    pub(crate) fn new(client: &'a MusicClient) -> Self {
        Self { client }
    }

    /// Fetch a playlist by owner uid and kind.
    pub async fn get(&self, uid: &str, kind: &str) -> Result<Playlist> {
        self.client
            .get_json(&format!("users/{}/playlists/{}", uid, kind), &[], "playlist")
            .await
    }

    /// Fetch a playlist by its uuid.
    pub async fn get_by_uuid(&self, uuid: &str) -> Result<Playlist> {
        self.client
            .get_json(&format!("playlists/{}", uuid), &[], "playlist")
            .await
    }

    /// Playlists owned by `uid`, without tracks.
    pub async fn list(&self, uid: &str) -> Result<Vec<Playlist>> {
        self.client
            .get_json(&format!("users/{}/playlists/list", uid), &[], "playlist list")
            .await
    }

    /// Fetch several playlists in one request.
    pub async fn get_batch(&self, keys: &[PlaylistKey]) -> Result<Vec<Playlist>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<String> = keys.iter().map(ToString::to_string).collect();
        self.client
            .post_form("playlists/list", &[("playlist-ids", join_ids(&ids))], "playlists")
            .await
    }

    /// Create a public playlist owned by the current account.
    pub async fn create(&self, title: &str) -> Result<Playlist> {
        let uid = self.client.require_uid().await?;
        let form = [
            ("title", title.to_string()),
            ("visibility", "public".to_string()),
        ];
        let playlist: Playlist = self
            .client
            .post_form(&format!("users/{}/playlists/create", uid), &form, "create playlist")
            .await?;

        info!(kind = %playlist.kind, title = %playlist.title, "Created playlist");
        Ok(playlist)
    }

    /// Rename a playlist of the current account.
    pub async fn rename(&self, kind: &str, title: &str) -> Result<Playlist> {
        let uid = self.client.require_uid().await?;
        self.client
            .post_form(
                &format!("users/{}/playlists/{}/name", uid, kind),
                &[("value", title.to_string())],
                "rename playlist",
            )
            .await
    }

    /// Delete a playlist of the current account.
    pub async fn delete(&self, kind: &str) -> Result<()> {
        let uid = self.client.require_uid().await?;
        let _: Value = self
            .client
            .post_form(
                &format!("users/{}/playlists/{}/delete", uid, kind),
                &[],
                "delete playlist",
            )
            .await?;

        info!(kind = %kind, "Deleted playlist");
        Ok(())
    }

    /// Apply a diff against the revision held by `playlist`.
    pub async fn change(&self, playlist: &Playlist, diff: &[PlaylistChange]) -> Result<Playlist> {
        let uid = playlist.owner_uid();
        if uid.is_empty() {
            return Err(ClientError::InvalidInput("playlist has no owner uid".into()));
        }

        let diff_json = serde_json::to_string(diff).map_err(|e| {
            ClientError::InvalidInput(format!("Failed to encode playlist diff: {}", e))
        })?;
        debug!(
            kind = %playlist.kind,
            revision = playlist.revision,
            changes = diff.len(),
            "Applying playlist change"
        );

        let form = [
            ("kind", playlist.kind.clone()),
            ("revision", playlist.revision.to_string()),
            ("diff", diff_json),
        ];
        self.client
            .post_form(
                &format!("users/{}/playlists/{}/change", uid, playlist.kind),
                &form,
                "playlist change",
            )
            .await
    }

    /// Insert tracks at position `at`.
    pub async fn insert_tracks(
        &self,
        playlist: &Playlist,
        tracks: Vec<TrackKey>,
        at: usize,
    ) -> Result<Playlist> {
        if tracks.is_empty() {
            return Ok(playlist.clone());
        }
        self.change(playlist, &[PlaylistChange::insert(at, tracks)])
            .await
    }

    /// Remove every occurrence of the given track ids.
    ///
    /// Positions come from the tracks expanded in `playlist`, so it must be a
    /// fresh read.
    pub async fn delete_tracks(&self, playlist: &Playlist, track_ids: &[&str]) -> Result<Playlist> {
        let diff = deletion_diff(playlist, track_ids);
        if diff.is_empty() {
            return Ok(playlist.clone());
        }
        self.change(playlist, &diff).await
    }
}

/// One delete per matching position, last position first so earlier
/// positions stay valid while the server applies them in order.
fn deletion_diff(playlist: &Playlist, track_ids: &[&str]) -> Vec<PlaylistChange> {
    let wanted: HashSet<&str> = track_ids.iter().copied().collect();

    playlist
        .tracks
        .iter()
        .enumerate()
        .rev()
        .filter_map(|(index, entry)| {
            let track = entry.track.as_ref()?;
            if !wanted.contains(track.id.as_str()) {
                return None;
            }
            Some(PlaylistChange::delete(index, index + 1, vec![track.key()]))
        })
        .collect()
}
