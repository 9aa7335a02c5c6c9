//! Scroll configuration for the feed follow/pause controller

use serde::Deserialize;
use std::time::Duration;

use crate::tui::scroll::{
    ScrollTuning, DEFAULT_ANIMATED_GUARD, DEFAULT_INSTANT_GUARD, DEFAULT_PROXIMITY_PX,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollConfig {
    /// Distance from the bottom (px) still treated as "at the bottom"
    pub proximity_px: f64,
    /// Ignore unattributed scroll events this long after an instant snap
    pub instant_guard_ms: u64,
    /// Same, after an animated jump
    pub animated_guard_ms: u64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            proximity_px: DEFAULT_PROXIMITY_PX,
            instant_guard_ms: DEFAULT_INSTANT_GUARD.as_millis() as u64,
            animated_guard_ms: DEFAULT_ANIMATED_GUARD.as_millis() as u64,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileScroll {
    pub proximity_px: Option<f64>,
    pub instant_guard_ms: Option<u64>,
    pub animated_guard_ms: Option<u64>,
}

impl ScrollConfig {
    pub fn from_file(file: Option<FileScroll>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            proximity_px: file
                .proximity_px
                .filter(|v| *v >= 0.0)
                .unwrap_or(defaults.proximity_px),
            instant_guard_ms: file.instant_guard_ms.unwrap_or(defaults.instant_guard_ms),
            animated_guard_ms: file.animated_guard_ms.unwrap_or(defaults.animated_guard_ms),
        }
    }

    pub fn tuning(&self) -> ScrollTuning {
        ScrollTuning {
            proximity: self.proximity_px,
            instant_guard: Duration::from_millis(self.instant_guard_ms),
            animated_guard: Duration::from_millis(self.animated_guard_ms),
        }
    }
}
