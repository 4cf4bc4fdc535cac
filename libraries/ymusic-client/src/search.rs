//! Search and suggestions.

use crate::client::MusicClient;
use crate::error::{ClientError, Result};
use ymusic_core::{SearchResults, SearchType, Suggestions};

/// Search client.
pub struct SearchClient<'a> {
    client: &'a MusicClient,
}

impl<'a> SearchClient<'a> {
    pub(crate) fn new(client: &'a MusicClient) -> Self {
        Self { client }
    }

    /// Full-text search.
    pub async fn search(
        &self,
        text: &str,
        kind: SearchType,
        page: u32,
        page_size: u32,
    ) -> Result<SearchResults> {
        if text.trim().is_empty() {
            return Err(ClientError::InvalidInput("search text is empty".into()));
        }

        let query = [
            ("text", text.to_string()),
            ("type", kind.as_str().to_string()),
            ("page", page.to_string()),
            ("pageSize", page_size.to_string()),
        ];
        self.client.get_json("search", &query, "search").await
    }

    /// Search tracks only.
    pub async fn tracks(&self, text: &str, page: u32, page_size: u32) -> Result<SearchResults> {
        self.search(text, SearchType::Track, page, page_size).await
    }

    /// Search albums only.
    pub async fn albums(&self, text: &str, page: u32, page_size: u32) -> Result<SearchResults> {
        self.search(text, SearchType::Album, page, page_size).await
    }

    /// Search artists only.
    pub async fn artists(&self, text: &str, page: u32, page_size: u32) -> Result<SearchResults> {
        self.search(text, SearchType::Artist, page, page_size).await
    }

    /// Search playlists only.
    pub async fn playlists(&self, text: &str, page: u32, page_size: u32) -> Result<SearchResults> {
        self.search(text, SearchType::Playlist, page, page_size).await
    }

    /// Completions for a partial query.
    pub async fn suggest(&self, part: &str) -> Result<Suggestions> {
        self.client
            .get_json("search/suggest", &[("part", part.to_string())], "suggest")
            .await
    }
}
