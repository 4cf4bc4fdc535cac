//! Resolution of the currently playing item.

use crate::error::Result;
use crate::types::{PlayableItem, PlayerSnapshot};
use tracing::debug;
use ymusic_core::{Track, TrackResolver};

/// The queue item the snapshot points at, if there is a usable one.
pub fn current_playable(snapshot: &PlayerSnapshot) -> Option<&PlayableItem> {
    let queue = snapshot.player_state.as_ref()?.player_queue.as_ref()?;
    queue.current().filter(|item| !item.playable_id.is_empty())
}

/// Look up the track behind the current item.
///
/// The resolver is only consulted when the snapshot names a playable id.
pub async fn resolve_current(
    snapshot: Option<&PlayerSnapshot>,
    resolver: &dyn TrackResolver,
) -> Result<Option<Track>> {
    let Some(item) = snapshot.and_then(current_playable) else {
        return Ok(None);
    };

    debug!(playable_id = %item.playable_id, "Resolving current track");
    Ok(resolver.resolve_track(&item.playable_id).await?)
}
