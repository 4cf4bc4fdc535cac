//! Album lookups.

use crate::client::MusicClient;
use crate::error::Result;
use crate::request::join_ids;
use tracing::debug;
use ymusic_core::Album;

/// Albums client.
pub struct AlbumsClient<'a> {
    client: &'a MusicClient,
}

impl<'a> AlbumsClient<'a> {
    pub(crate) fn new(client: &'a MusicClient) -> Self {
        Self { client }
    }

    /// Fetch an album with its tracks grouped by volume.
    pub async fn get(&self, id: &str) -> Result<Album> {
        let album: Album = self
            .client
            .get_json(&format!("albums/{}/with-tracks", id), &[], "album")
            .await?;

        debug!(
            album = %album.id,
            volumes = album.volumes.len(),
            "Fetched album"
        );
        Ok(album)
    }

    /// Fetch several albums without tracks.
    pub async fn get_many<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<Album>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.client
            .post_form("albums", &[("album-ids", join_ids(ids))], "albums")
            .await
    }
}
