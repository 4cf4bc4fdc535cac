//! Artist lookups.

use crate::client::MusicClient;
use crate::error::Result;
use crate::request::join_ids;
use tracing::debug;
use ymusic_core::{Artist, ArtistBriefInfo, TracksPage};

/// Page size used when the artist track count is unknown.
const DEFAULT_PAGE_SIZE: u32 = 20;

/// Artists client.
pub struct ArtistsClient<'a> {
    client: &'a MusicClient,
}

impl<'a> ArtistsClient<'a> {
    pub(crate) fn new(client: &'a MusicClient) -> Self {
        Self { client }
    }

    /// Artist card: the artist, popular tracks, albums and similar artists.
    pub async fn brief_info(&self, id: &str) -> Result<ArtistBriefInfo> {
        self.client
            .get_json(&format!("artists/{}/brief-info", id), &[], "artist brief info")
            .await
    }

    /// Fetch several artists.
    pub async fn get_many<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<Artist>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        // the endpoint really spells it with a capital I
        self.client
            .post_form("artists", &[("artist-Ids", join_ids(ids))], "artists")
            .await
    }

    /// One page of an artist's tracks.
    pub async fn tracks(&self, id: &str, page: u32, page_size: u32) -> Result<TracksPage> {
        self.client
            .get_json(
                &format!("artists/{}/tracks", id),
                &[("page", page.to_string()), ("pageSize", page_size.to_string())],
                "artist tracks",
            )
            .await
    }

    /// Every track of an artist in a single page sized from the artist counters.
    pub async fn all_tracks(&self, id: &str) -> Result<TracksPage> {
        let brief = self.brief_info(id).await?;
        let total = brief
            .artist
            .and_then(|a| a.counts)
            .map(|c| c.tracks)
            .filter(|&n| n > 0)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(DEFAULT_PAGE_SIZE);

        debug!(artist = %id, page_size = total, "Fetching all artist tracks");
        self.tracks(id, 0, total).await
    }
}
