//! Search types

use super::{Album, Artist, Playlist, Track};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What to search for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchType {
    #[default]
    All,
    Track,
    Album,
    Artist,
    Playlist,
    PodcastEpisode,
    Video,
    User,
}

impl SearchType {
    /// Value of the `type` query parameter
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Track => "track",
            Self::Album => "album",
            Self::Artist => "artist",
            Self::Playlist => "playlist",
            Self::PodcastEpisode => "podcastEpisode",
            Self::Video => "video",
            Self::User => "user",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SearchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "track" | "tracks" => Ok(Self::Track),
            "album" | "albums" => Ok(Self::Album),
            "artist" | "artists" => Ok(Self::Artist),
            "playlist" | "playlists" => Ok(Self::Playlist),
            "podcastepisode" | "podcast" => Ok(Self::PodcastEpisode),
            "video" | "videos" => Ok(Self::Video),
            "user" | "users" => Ok(Self::User),
            other => Err(format!("unknown search type: {other}")),
        }
    }
}

/// One result block
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSection<T> {
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub per_page: i64,
    #[serde(default)]
    pub order: i64,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Default for SearchSection<T> {
    fn default() -> Self {
        Self {
            total: 0,
            per_page: 0,
            order: 0,
            results: Vec::new(),
        }
    }
}

/// Best match, shape depends on `type`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchBest {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub result: serde_json::Value,
}

/// `search`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub per_page: i64,
    #[serde(default)]
    pub search_request_id: Option<String>,
    #[serde(default)]
    pub misspell_corrected: bool,
    #[serde(default)]
    pub misspell_result: Option<String>,
    #[serde(default)]
    pub best: Option<SearchBest>,
    #[serde(default)]
    pub tracks: Option<SearchSection<Track>>,
    #[serde(default)]
    pub albums: Option<SearchSection<Album>>,
    #[serde(default)]
    pub artists: Option<SearchSection<Artist>>,
    #[serde(default)]
    pub playlists: Option<SearchSection<Playlist>>,
    #[serde(default, rename = "podcast_episodes")]
    pub podcast_episodes: Option<SearchSection<Track>>,
}

/// `search/suggest`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Suggestions {
    #[serde(default)]
    pub best: Option<SearchBest>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_partial_results() {
        let results: SearchResults = serde_json::from_value(json!({
            "text": "muse",
            "page": 0,
            "perPage": 10,
            "tracks": {"total": 1, "perPage": 10, "order": 1, "results": [{"id": 1, "title": "Uprising"}]},
            "best": {"type": "artist", "result": {"id": 3347, "name": "Muse"}}
        }))
        .unwrap();

        let tracks = results.tracks.unwrap();
        assert_eq!(tracks.results[0].title, "Uprising");
        assert!(results.albums.is_none());
        assert_eq!(results.best.unwrap().kind, "artist");
    }

    #[test]
    fn search_type_round_trips_through_str() {
        let parsed: SearchType = "podcastEpisode".parse().unwrap();
        assert_eq!(parsed, SearchType::PodcastEpisode);
        assert_eq!(parsed.as_str(), "podcastEpisode");
        assert!("songs".parse::<SearchType>().is_err());
    }
}
