//! [`TrackResolver`] backed by the `tracks` endpoint.

use crate::client::MusicClient;
use async_trait::async_trait;
use tracing::debug;
use ymusic_core::{MusicError, Track, TrackResolver};

#[async_trait]
impl TrackResolver for MusicClient {
    async fn resolve_track(&self, playable_id: &str) -> ymusic_core::Result<Option<Track>> {
        if playable_id.is_empty() {
            return Ok(None);
        }

        let mut tracks = self
            .tracks()
            .get(&[playable_id])
            .await
            .map_err(MusicError::from)?;

        debug!(playable_id, found = !tracks.is_empty(), "Resolved playable");
        Ok(if tracks.is_empty() {
            None
        } else {
            Some(tracks.swap_remove(0))
        })
    }
}
