//! Last-known player snapshot.

use crate::types::PlayerSnapshot;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared slot holding the latest snapshot.
///
/// Writers replace the whole snapshot; readers always get their own copy, so
/// nothing a caller does to a returned snapshot is visible to anyone else.
#[derive(Debug, Clone, Default)]
pub struct SnapshotCache {
    inner: Arc<RwLock<Option<PlayerSnapshot>>>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current snapshot, `None` until the first one arrives
    pub async fn get(&self) -> Option<PlayerSnapshot> {
        self.inner.read().await.clone()
    }

    /// Replace the snapshot wholesale
    pub async fn replace(&self, snapshot: PlayerSnapshot) {
        *self.inner.write().await = Some(snapshot);
    }
}
