//! Artist types

use super::{Album, ArtistId, Pager, Track};
use crate::serde_util::lenient_i64;
use serde::{Deserialize, Serialize};

/// Short artist reference embedded in tracks and albums
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: ArtistId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub various: bool,
}

/// Full artist
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: ArtistId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub counts: Option<ArtistCounts>,
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub composer: bool,
    #[serde(default)]
    pub various: bool,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub likes_count: i64,
    #[serde(default)]
    pub og_image: Option<String>,
}

/// Catalog counters of an artist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistCounts {
    #[serde(default)]
    pub tracks: i64,
    #[serde(default)]
    pub direct_albums: i64,
    #[serde(default)]
    pub also_albums: i64,
    #[serde(default)]
    pub also_tracks: i64,
}

/// `artists/{id}/brief-info`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistBriefInfo {
    #[serde(default)]
    pub artist: Option<Artist>,
    #[serde(default)]
    pub albums: Vec<Album>,
    #[serde(default)]
    pub also_albums: Vec<Album>,
    #[serde(default)]
    pub popular_tracks: Vec<Track>,
    #[serde(default)]
    pub similar_artists: Vec<Artist>,
    #[serde(default)]
    pub last_release_ids: Vec<String>,
}

/// One page of `artists/{id}/tracks`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TracksPage {
    #[serde(default)]
    pub pager: Option<Pager>,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl TracksPage {
    /// True when the pager says more pages follow
    pub fn has_more(&self) -> bool {
        self.pager.is_some_and(|p| {
            let seen = (p.page + 1).saturating_mul(p.per_page);
            p.per_page > 0 && seen < p.total
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pager_drives_has_more() {
        let page: TracksPage = serde_json::from_value(json!({
            "pager": {"page": 0, "perPage": 20, "total": 45},
            "tracks": []
        }))
        .unwrap();
        assert!(page.has_more());

        let last: TracksPage = serde_json::from_value(json!({
            "pager": {"page": 2, "perPage": 20, "total": 45},
            "tracks": []
        }))
        .unwrap();
        assert!(!last.has_more());
    }
}
