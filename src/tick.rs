//! Fixed-cadence redraw scheduling.
//!
//! Each registered surface keeps its own deadline, so surfaces tick
//! independently even when they share an interval. The scheduler only says
//! which surfaces are due; the host dispatches `on_tick` to them one at a time.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::surface::SurfaceId;

/// Default redraw interval (about 60 Hz).
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(16);
/// Shortest accepted redraw interval.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy)]
struct Registration {
    interval: Duration,
    next: Instant,
}

#[derive(Debug, Default)]
struct SchedulerState {
    entries: BTreeMap<SurfaceId, Registration>,
}

/// Shared tick source. Clones refer to the same schedule.
#[derive(Debug, Clone, Default)]
pub struct TickScheduler {
    inner: Arc<RwLock<SchedulerState>>,
}

impl TickScheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a surface, first due one interval from now.
    pub fn register(&self, id: SurfaceId, interval: Duration) {
        self.register_at(id, interval, Instant::now());
    }

    /// Register a surface, first due one interval after `now`.
    ///
    /// Re-registering replaces the previous interval and deadline. Intervals
    /// shorter than [`MIN_TICK_INTERVAL`] are raised to it.
    pub fn register_at(&self, id: SurfaceId, interval: Duration, now: Instant) {
        let interval = interval.max(MIN_TICK_INTERVAL);
        let mut state = self.inner.write().expect("tick scheduler lock");
        state.entries.insert(
            id,
            Registration {
                interval,
                next: now + interval,
            },
        );
        tracing::trace!(surface = %id, ?interval, "registered for ticks");
    }

    /// Stop delivering ticks to a surface. Returns false if it was not registered.
    pub fn unregister(&self, id: SurfaceId) -> bool {
        let removed = self
            .inner
            .write()
            .expect("tick scheduler lock")
            .entries
            .remove(&id)
            .is_some();
        if removed {
            tracing::trace!(surface = %id, "unregistered from ticks");
        }
        removed
    }

    /// Check whether a surface is registered.
    pub fn is_registered(&self, id: SurfaceId) -> bool {
        self.inner
            .read()
            .expect("tick scheduler lock")
            .entries
            .contains_key(&id)
    }

    /// Number of registered surfaces.
    pub fn len(&self) -> usize {
        self.inner.read().expect("tick scheduler lock").entries.len()
    }

    /// True when no surface is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Surfaces whose deadline has passed, in id order. Advances their deadlines.
    ///
    /// A surface that fell more than one interval behind is re-armed relative
    /// to `now` rather than receiving a burst of catch-up ticks.
    pub fn due(&self, now: Instant) -> Vec<SurfaceId> {
        let mut state = self.inner.write().expect("tick scheduler lock");
        let mut due = Vec::new();
        for (id, entry) in state.entries.iter_mut() {
            if entry.next > now {
                continue;
            }
            due.push(*id);
            entry.next += entry.interval;
            if entry.next <= now {
                entry.next = now + entry.interval;
            }
        }
        due
    }

    /// Earliest pending deadline across all surfaces.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.inner
            .read()
            .expect("tick scheduler lock")
            .entries
            .values()
            .map(|entry| entry.next)
            .min()
    }
}
