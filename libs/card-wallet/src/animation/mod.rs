//! Virtual clock that runs animation continuations and deferred callbacks.
//!
//! A [`Timeline`] stands in for the UI run loop. Transitions have fixed
//! durations; whatever must happen "after the animation" is a continuation
//! the timeline runs once the clock has been advanced past its deadline.
//! Hosts drive the clock from their frame callback; tests drive it by hand.

pub mod animated;
pub mod curve;

pub use animated::{Animated, Interpolate};
pub use curve::{AnimationSpec, Curve};

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Handle to a scheduled continuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimationId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingKind {
    Animation,
    Timer,
}

struct Pending {
    id: AnimationId,
    due: Duration,
    kind: PendingKind,
    continuation: Box<dyn FnOnce()>,
}

struct Schedule {
    next_id: u64,
    pending: Vec<Pending>,
}

struct TimelineInner {
    now: Cell<Duration>,
    /// Specs of the `animate` calls currently running their closures.
    context: RefCell<Vec<AnimationSpec>>,
    schedule: RefCell<Schedule>,
}

/// Cloneable handle to a single-threaded clock.
#[derive(Clone)]
pub struct Timeline {
    inner: Rc<TimelineInner>,
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(TimelineInner {
                now: Cell::new(Duration::ZERO),
                context: RefCell::new(Vec::new()),
                schedule: RefCell::new(Schedule {
                    next_id: 0,
                    pending: Vec::new(),
                }),
            }),
        }
    }

    pub fn now(&self) -> Duration {
        self.inner.now.get()
    }

    /// Run `animations` now, capturing every animatable property change it
    /// makes as a transition described by `spec`, and schedule `completion`
    /// for when that transition ends.
    pub fn animate<A, C>(&self, spec: AnimationSpec, animations: A, completion: C) -> AnimationId
    where
        A: FnOnce(),
        C: FnOnce() + 'static,
    {
        self.inner.context.borrow_mut().push(spec);
        animations();
        self.inner.context.borrow_mut().pop();

        self.schedule(spec.duration, PendingKind::Animation, Box::new(completion))
    }

    /// Run `callback` once `delay` has elapsed.
    pub fn after<F>(&self, delay: Duration, callback: F) -> AnimationId
    where
        F: FnOnce() + 'static,
    {
        self.schedule(delay, PendingKind::Timer, Box::new(callback))
    }

    /// Drop a pending deferred callback. Returns whether it was still pending.
    pub fn cancel(&self, id: AnimationId) -> bool {
        let mut schedule = self.inner.schedule.borrow_mut();
        let before = schedule.pending.len();
        schedule
            .pending
            .retain(|pending| !(pending.id == id && pending.kind == PendingKind::Timer));
        schedule.pending.len() != before
    }

    /// The transition an animatable property set right now should use.
    pub fn current_spec(&self) -> Option<AnimationSpec> {
        self.inner.context.borrow().last().copied()
    }

    /// Move the clock forward by `dt`, running every continuation that falls
    /// due in deadline order. Returns how many ran.
    pub fn advance(&self, dt: Duration) -> usize {
        let target = self.now() + dt;
        let mut ran = 0;

        while let Some(pending) = self.take_due(target) {
            if pending.due > self.now() {
                self.inner.now.set(pending.due);
            }
            tracing::trace!(id = pending.id.0, kind = ?pending.kind, "running continuation");
            (pending.continuation)();
            ran += 1;
        }

        self.inner.now.set(target);
        ran
    }

    /// Advance until nothing is pending. Returns how many continuations ran.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while let Some(due) = self.next_deadline() {
            ran += self.advance(due.saturating_sub(self.now()));
        }
        ran
    }

    pub fn is_idle(&self) -> bool {
        self.inner.schedule.borrow().pending.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.inner.schedule.borrow().pending.len()
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.inner
            .schedule
            .borrow()
            .pending
            .iter()
            .map(|pending| pending.due)
            .min()
    }

    fn schedule(
        &self,
        delay: Duration,
        kind: PendingKind,
        continuation: Box<dyn FnOnce()>,
    ) -> AnimationId {
        let mut schedule = self.inner.schedule.borrow_mut();
        let id = AnimationId(schedule.next_id);
        schedule.next_id += 1;
        schedule.pending.push(Pending {
            id,
            due: self.now() + delay,
            kind,
            continuation,
        });
        id
    }

    fn take_due(&self, target: Duration) -> Option<Pending> {
        let mut schedule = self.inner.schedule.borrow_mut();
        let index = schedule
            .pending
            .iter()
            .enumerate()
            .filter(|(_, pending)| pending.due <= target)
            .min_by_key(|(_, pending)| (pending.due, pending.id))
            .map(|(index, _)| index)?;
        Some(schedule.pending.remove(index))
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("now", &self.now())
            .field("pending", &self.pending())
            .finish()
    }
}
