use std::sync::Arc;
use tracing::{debug, warn};

use super::KeyValueStore;
use crate::constants::SNAPSHOT_KEY;
use crate::models::{CachedSnapshot, Coordinate, PlaceResult};

/// Single-slot, best-effort cache of the last ranked result set. Failures are
/// logged and never reach the caller.
#[derive(Clone)]
pub struct SnapshotCache {
    store: Arc<dyn KeyValueStore>,
    key: String,
    enabled: bool,
}

impl SnapshotCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            key: SNAPSHOT_KEY.to_string(),
            enabled: true,
        }
    }

    pub fn disabled(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            enabled: false,
            ..Self::new(store)
        }
    }

    /// Replaces any earlier snapshot wholesale. The file work runs on the
    /// blocking pool.
    pub async fn save(&self, results: &[PlaceResult], origin: Coordinate) -> bool {
        if !self.enabled {
            return false;
        }

        let snapshot = CachedSnapshot::new(results, origin);
        let count = snapshot.results.len();
        let value = match serde_json::to_value(&snapshot) {
            Ok(v) => v,
            Err(e) => {
                warn!("Failed to serialize result snapshot: {}", e);
                return false;
            }
        };

        let store = Arc::clone(&self.store);
        let key = self.key.clone();
        match tokio::task::spawn_blocking(move || store.set(&key, &value)).await {
            Ok(Ok(())) => {
                debug!("Cached {} results", count);
                true
            }
            Ok(Err(e)) => {
                warn!("Failed to persist result snapshot: {}", e);
                false
            }
            Err(e) => {
                warn!("Snapshot write task failed: {}", e);
                false
            }
        }
    }

    /// Absent, unreadable and malformed snapshots all come back as `None`.
    pub async fn load(&self) -> Option<CachedSnapshot> {
        if !self.enabled {
            return None;
        }

        let store = Arc::clone(&self.store);
        let key = self.key.clone();
        let value = match tokio::task::spawn_blocking(move || store.get(&key)).await {
            Ok(Ok(Some(v))) => v,
            Ok(Ok(None)) => return None,
            Ok(Err(e)) => {
                warn!("Failed to read result snapshot: {}", e);
                return None;
            }
            Err(e) => {
                warn!("Snapshot read task failed: {}", e);
                return None;
            }
        };

        match serde_json::from_value(value) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("Ignoring malformed result snapshot: {}", e);
                None
            }
        }
    }
}
