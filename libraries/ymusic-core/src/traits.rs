/// Collaborator traits shared between SDK crates
use crate::error::Result;
use crate::types::Track;
use async_trait::async_trait;

/// Resolves a playable identifier to full track metadata.
///
/// This is the only outside capability the sync client depends on. The HTTP
/// client implements it on top of the `tracks` endpoint; tests substitute a
/// mock.
///
/// Implementations return `Ok(None)` when the service knows nothing about
/// the identifier, and an error only when the lookup itself failed.
#[async_trait]
pub trait TrackResolver: Send + Sync {
    /// Look up the track behind `playable_id`
    ///
    /// # Errors
    /// Returns an error if the lookup could not be performed
    async fn resolve_track(&self, playable_id: &str) -> Result<Option<Track>>;
}

#[async_trait]
impl<T: TrackResolver + ?Sized> TrackResolver for std::sync::Arc<T> {
    async fn resolve_track(&self, playable_id: &str) -> Result<Option<Track>> {
        (**self).resolve_track(playable_id).await
    }
}
