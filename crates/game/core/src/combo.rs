//! Merge combo tracking.

use core::time::Duration;

use crate::config::ComboConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComboUpdate {
    pub count: u32,
    /// True whenever `count` is at or above the threshold, not only on the
    /// merge that first reaches it.
    pub fired: bool,
}

/// Counts merges that land within a rolling window of the previous one.
///
/// A passive observer: it never gates a merge. Instants are offsets on the
/// caller's monotonic session clock.
#[derive(Clone, Debug)]
pub struct ComboTracker {
    config: ComboConfig,
    last_merge: Option<Duration>,
    count: u32,
}

impl ComboTracker {
    pub fn new(config: ComboConfig) -> Self {
        Self {
            config,
            last_merge: None,
            count: 0,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn register_merge(&mut self, now: Duration) -> ComboUpdate {
        let within_window = self
            .last_merge
            .is_some_and(|last| now.saturating_sub(last) < self.config.window());

        self.count = if within_window { self.count + 1 } else { 1 };
        self.last_merge = Some(now);

        ComboUpdate {
            count: self.count,
            fired: self.count >= self.config.threshold,
        }
    }

    pub fn reset(&mut self) {
        self.last_merge = None;
        self.count = 0;
    }
}
