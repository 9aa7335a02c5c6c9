//! Catalog ownership and generation-guarded replacement
//!
//! Every rebuild request takes a new generation number. A finished build is
//! installed only if it carries the latest generation, so a slow build that
//! was superseded by a later channel connect can never overwrite the newer
//! catalog. Until a replacement lands the previous catalog keeps serving.

use super::Catalog;
use std::sync::Arc;

/// Owner of the active catalog
#[derive(Debug)]
pub struct CatalogStore {
    current: Arc<Catalog>,
    latest_requested: u64,
    building: bool,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self {
            current: Arc::new(Catalog::empty()),
            latest_requested: 0,
            building: false,
        }
    }

    /// Reserve the generation for a new build
    pub fn begin_rebuild(&mut self) -> u64 {
        self.latest_requested += 1;
        self.building = true;
        self.latest_requested
    }

    /// Swap in a finished catalog if it is the latest generation
    ///
    /// Returns false (and drops the catalog) for superseded builds.
    pub fn install(&mut self, catalog: Catalog) -> bool {
        if catalog.generation() != self.latest_requested {
            tracing::debug!(
                "Discarding superseded catalog generation {} (latest is {})",
                catalog.generation(),
                self.latest_requested
            );
            return false;
        }

        self.current = Arc::new(catalog);
        self.building = false;
        true
    }

    /// Snapshot of the active catalog
    pub fn current(&self) -> Arc<Catalog> {
        Arc::clone(&self.current)
    }

    /// Whether the latest requested build has not landed yet
    pub fn is_building(&self) -> bool {
        self.building
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}
