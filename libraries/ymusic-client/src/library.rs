//! Likes, dislikes and listening history of the current account.
//!
//! Every endpoint here lives under `users/{uid}/`, so the uid must be known:
//! call `account().status()` first.

use crate::client::MusicClient;
use crate::error::Result;
use crate::request::join_ids;
use serde_json::Value;
use tracing::debug;
use ymusic_core::types::{LikedItem, LikedPlaylist};
use ymusic_core::{
    Artist, LibraryList, LibrarySection, LikedTracks, PlayContextType, RecentlyListenedContexts,
    Revision, TrackKey,
};

/// Library client.
pub struct LibraryClient<'a> {
    client: &'a MusicClient,
}

impl<'a> LibraryClient<'a> {
    pub(crate) fn new(client: &'a MusicClient) -> Self {
        Self { client }
    }

    async fn section_path(&self, list: LibraryList, section: LibrarySection) -> Result<String> {
        let uid = self.client.require_uid().await?;
        Ok(format!("users/{}/{}/{}", uid, list.as_str(), section.as_str()))
    }

    async fn read<T: serde::de::DeserializeOwned>(
        &self,
        list: LibraryList,
        section: LibrarySection,
    ) -> Result<T> {
        let path = self.section_path(list, section).await?;
        self.client.get_json(&path, &[], "library section").await
    }

    async fn modify<T: serde::de::DeserializeOwned>(
        &self,
        list: LibraryList,
        section: LibrarySection,
        add: bool,
        ids: &[String],
    ) -> Result<T> {
        let action = if add { "add-multiple" } else { "remove" };
        let path = format!("{}/{}", self.section_path(list, section).await?, action);

        debug!(
            list = list.as_str(),
            section = section.as_str(),
            action,
            count = ids.len(),
            "Modifying library"
        );

        self.client
            .post_form(&path, &[(section.ids_field(), join_ids(ids))], "library change")
            .await
    }

    /// Liked tracks.
    pub async fn liked_tracks(&self) -> Result<LikedTracks> {
        self.read(LibraryList::Likes, LibrarySection::Tracks).await
    }

    /// Disliked tracks.
    pub async fn disliked_tracks(&self) -> Result<LikedTracks> {
        self.read(LibraryList::Dislikes, LibrarySection::Tracks).await
    }

    /// Liked albums.
    pub async fn liked_albums(&self) -> Result<Vec<LikedItem>> {
        self.read(LibraryList::Likes, LibrarySection::Albums).await
    }

    /// Liked artists.
    pub async fn liked_artists(&self) -> Result<Vec<Artist>> {
        self.read(LibraryList::Likes, LibrarySection::Artists).await
    }

    /// Liked playlists.
    pub async fn liked_playlists(&self) -> Result<Vec<LikedPlaylist>> {
        self.read(LibraryList::Likes, LibrarySection::Playlists).await
    }

    /// Like tracks. Returns the new library revision.
    pub async fn like_tracks(&self, keys: &[TrackKey]) -> Result<Revision> {
        self.modify(LibraryList::Likes, LibrarySection::Tracks, true, &keys_to_ids(keys))
            .await
    }

    /// Remove tracks from likes.
    pub async fn unlike_tracks(&self, keys: &[TrackKey]) -> Result<Revision> {
        self.modify(LibraryList::Likes, LibrarySection::Tracks, false, &keys_to_ids(keys))
            .await
    }

    /// Dislike tracks.
    pub async fn dislike_tracks(&self, keys: &[TrackKey]) -> Result<Revision> {
        self.modify(LibraryList::Dislikes, LibrarySection::Tracks, true, &keys_to_ids(keys))
            .await
    }

    /// Remove tracks from dislikes.
    pub async fn undislike_tracks(&self, keys: &[TrackKey]) -> Result<Revision> {
        self.modify(LibraryList::Dislikes, LibrarySection::Tracks, false, &keys_to_ids(keys))
            .await
    }

    /// Like or unlike an album, artist or playlist (`uid:kind`).
    pub async fn set_liked(&self, section: LibrarySection, id: &str, liked: bool) -> Result<()> {
        let _: Value = self
            .modify(LibraryList::Likes, section, liked, &[id.to_string()])
            .await?;
        Ok(())
    }

    /// Listening history grouped by context.
    pub async fn recently_listened(
        &self,
        types: &[PlayContextType],
        track_count: u32,
        context_count: u32,
    ) -> Result<RecentlyListenedContexts> {
        let uid = self.client.require_uid().await?;
        let types = types
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");

        let query = [
            ("trackCount", track_count.to_string()),
            ("contextCount", context_count.to_string()),
            ("types", types),
        ];
        self.client
            .get_json(&format!("users/{}/contexts", uid), &query, "recently listened")
            .await
    }
}

fn keys_to_ids(keys: &[TrackKey]) -> Vec<String> {
    keys.iter().map(ToString::to_string).collect()
}
