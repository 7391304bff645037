//! Logical Clock & Scheduled Tasks
//!
//! The whole orchestration core runs on a logical clock that only advances
//! inside the per-frame update, never on wall time. Delayed work (clearing
//! a transition slot, the grace delay before an automatic idle return) is
//! modeled as explicit scheduled tasks in a [`TimerQueue`], keyed by
//! slotmap tokens so any pending continuation can be cancelled
//! deterministically during supersession or teardown.

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

new_key_type! {
    /// Cancellation token for a task scheduled in a [`TimerQueue`].
    pub struct TimerKey;
}

/// Frame-driven logical clock.
///
/// Accumulates delta time; `now()` is the total logical seconds elapsed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    now: f64,
    frame: u64,
}

impl FrameClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the clock by one frame's delta time (in seconds).
    pub fn advance(&mut self, dt: f32) {
        self.now += f64::from(dt.max(0.0));
        self.frame += 1;
    }

    /// Total logical seconds elapsed.
    #[inline]
    #[must_use]
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Total number of frames ticked.
    #[inline]
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[derive(Debug, Clone)]
struct Scheduled<T> {
    fire_at: f64,
    task: T,
}

/// A queue of tasks scheduled against the logical clock.
///
/// Tasks fire when [`poll`](Self::poll) is called with a time at or past
/// their deadline, in deadline order. Each scheduled task returns a
/// [`TimerKey`] that stays valid until the task fires or is cancelled.
#[derive(Debug)]
pub struct TimerQueue<T> {
    tasks: SlotMap<TimerKey, Scheduled<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: SlotMap::with_key(),
        }
    }

    /// Schedules `task` to fire at the given logical time.
    pub fn schedule(&mut self, fire_at: f64, task: T) -> TimerKey {
        self.tasks.insert(Scheduled { fire_at, task })
    }

    /// Cancels a pending task. Returns `false` if it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        self.tasks.remove(key).is_some()
    }

    /// Whether the token still refers to a pending task.
    #[must_use]
    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.tasks.contains_key(key)
    }

    /// Removes and returns all tasks due at `now`, ordered by deadline.
    pub fn poll(&mut self, now: f64) -> SmallVec<[T; 2]> {
        let mut due: SmallVec<[(TimerKey, f64); 2]> = self
            .tasks
            .iter()
            .filter(|(_, s)| s.fire_at <= now)
            .map(|(key, s)| (key, s.fire_at))
            .collect();
        due.sort_by(|a, b| a.1.total_cmp(&b.1));

        due.into_iter()
            .filter_map(|(key, _)| self.tasks.remove(key).map(|s| s.task))
            .collect()
    }

    /// Drops every pending task.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
