//! Per-source pacing for upstream requests.
//!
//! Every source tag keeps the dispatch slot of its most recent request. A new
//! request reserves `max(now, last_slot + interval)` and then waits for it.
//! The reservation happens under the lock, the wait does not, so concurrent
//! callers on one tag are spaced out while other tags proceed untouched.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, warn};
use tokio::time::Instant;

use super::source::{PacingConfig, SourceTag};

/// Minimum-interval rate limiter keyed by [`SourceTag`].
///
/// Share one instance (behind an `Arc`) across every client that talks to
/// the same upstreams.
pub struct RateLimiter {
    /// Last reserved dispatch slot per tag.
    slots: Mutex<HashMap<SourceTag, Instant>>,
    /// Interval configuration.
    pacing: Mutex<PacingConfig>,
}

impl RateLimiter {
    pub fn new(pacing: PacingConfig) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            pacing: Mutex::new(pacing),
        }
    }

    /// Limiter that never waits. Used by offline tests.
    pub fn unpaced() -> Self {
        Self::new(PacingConfig::uniform(Duration::ZERO))
    }

    /// Lock the slots mutex, recovering from poison if necessary.
    fn lock_slots(&self) -> MutexGuard<'_, HashMap<SourceTag, Instant>> {
        self.slots.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter slots mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn lock_pacing(&self) -> MutexGuard<'_, PacingConfig> {
        self.pacing.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter pacing mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Change the interval for one tag. Takes effect on the next reservation.
    pub fn configure(&self, tag: SourceTag, interval: Duration) {
        self.lock_pacing().set_interval(tag, interval);
    }

    pub fn interval(&self, tag: SourceTag) -> Duration {
        self.lock_pacing().interval(tag)
    }

    /// Reserve the next dispatch slot for `tag` and wait until it arrives.
    ///
    /// Returns the slot, i.e. the earliest instant the caller may dispatch.
    pub async fn acquire(&self, tag: SourceTag) -> Instant {
        let interval = self.interval(tag);

        let slot = {
            let mut slots = self.lock_slots();
            let now = Instant::now();
            let slot = match slots.get(&tag) {
                Some(last) => (*last + interval).max(now),
                None => now,
            };
            slots.insert(tag, slot);
            slot
        };

        let now = Instant::now();
        if slot > now {
            debug!(
                "Rate limiter: waiting {:?} for source '{}'",
                slot - now,
                tag
            );
            tokio::time::sleep_until(slot).await;
        }

        slot
    }

    /// Forget the last slot of a tag.
    pub fn reset(&self, tag: SourceTag) {
        self.lock_slots().remove(&tag);
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(PacingConfig::default())
    }
}
