//! Touch state machines behind a card's gestures.
//!
//! Both trackers are pure: they take touch samples and the current time and
//! report what happened. The card applies the visual consequences and owns
//! the timers.

use crate::animation::AnimationId;
use kurbo::{Point, Rect, Vec2};
use std::time::Duration;

/// Vertical travel beyond which a downward fling sends the card back.
pub const SWAP_DOWN_THRESHOLD: f64 = 200.0;
/// Vertical travel below which an upward fling sends the card back.
pub const SWAP_UP_THRESHOLD: f64 = -50.0;
/// Movement a tap may tolerate before it counts as a drag.
pub const TAP_SLOP: f64 = 10.0;
/// Longest press still recognized as a tap.
pub const MAX_TAP_DURATION: Duration = Duration::from_millis(500);
/// Window in which a second tap turns into a double tap.
pub const DOUBLE_TAP_WINDOW: Duration = Duration::from_millis(300);

/// One touch sample as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    /// Location in the card's parent coordinate space, if the host has one.
    pub location: Option<Point>,
    /// Whether the touch hit this card rather than something else.
    pub on_card: bool,
}

impl Touch {
    pub fn on_card(location: impl Into<Point>) -> Self {
        Self {
            location: Some(location.into()),
            on_card: true,
        }
    }

    pub fn elsewhere(location: impl Into<Point>) -> Self {
        Self {
            location: Some(location.into()),
            on_card: false,
        }
    }

    /// A touch on the card whose coordinates were lost.
    pub fn without_location() -> Self {
        Self {
            location: None,
            on_card: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSession {
    original_frame: Rect,
    start: Option<Point>,
    anchor: Option<Point>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// Not ours to track (idle, or the touch is elsewhere).
    Ignored,
    /// Follow the finger by this much.
    Translate(Vec2),
    /// Coordinates went missing; put the card back.
    Abort { original_frame: Rect },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EndOutcome {
    Idle,
    Swap,
    Restore { original_frame: Rect },
}

/// Idle / Tracking state machine for dragging a card around.
#[derive(Debug, Default)]
pub struct DragTracker {
    session: Option<DragSession>,
}

impl DragTracker {
    pub fn is_tracking(&self) -> bool {
        self.session.is_some()
    }

    pub fn began(&mut self, frame: Rect, touch: &Touch) {
        let anchor = if touch.on_card { touch.location } else { None };
        self.session = Some(DragSession {
            original_frame: frame,
            start: anchor,
            anchor,
        });
    }

    pub fn moved(&mut self, touch: &Touch) -> MoveOutcome {
        let Some(session) = self.session.as_mut() else {
            return MoveOutcome::Ignored;
        };
        if !touch.on_card {
            return MoveOutcome::Ignored;
        }

        match (session.anchor, touch.location) {
            (Some(anchor), Some(location)) => {
                session.anchor = Some(location);
                MoveOutcome::Translate(location - anchor)
            }
            _ => {
                let original_frame = session.original_frame;
                self.session = None;
                MoveOutcome::Abort { original_frame }
            }
        }
    }

    pub fn ended(&mut self, touch: &Touch) -> EndOutcome {
        let Some(session) = self.session.take() else {
            return EndOutcome::Idle;
        };

        let travel = match (session.start, session.anchor) {
            (Some(start), Some(anchor)) => anchor.y - start.y,
            _ => {
                return EndOutcome::Restore {
                    original_frame: session.original_frame,
                }
            }
        };

        if touch.on_card && (travel > SWAP_DOWN_THRESHOLD || travel < SWAP_UP_THRESHOLD) {
            EndOutcome::Swap
        } else {
            EndOutcome::Restore {
                original_frame: session.original_frame,
            }
        }
    }

    /// Forget the drag; returns the frame to restore if one was in flight.
    pub fn cancelled(&mut self) -> Option<Rect> {
        self.session.take().map(|session| session.original_frame)
    }
}

#[derive(Debug, Clone, Copy)]
struct TapCandidate {
    began_at: Duration,
    origin: Option<Point>,
    valid: bool,
}

#[derive(Debug, Clone, Copy)]
struct PendingTap {
    timer: AnimationId,
    at: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    None,
    /// A tap landed; it becomes a single tap unless a second one follows.
    Candidate,
    /// Second tap inside the window; the pending single tap must be dropped.
    DoubleTap { cancelled: AnimationId },
}

/// Tap and double-tap recognition, independent of dragging.
///
/// Double tap wins: a single tap is only confirmed once its window passes
/// without a second tap.
#[derive(Debug, Default)]
pub struct TapRecognizer {
    candidate: Option<TapCandidate>,
    pending: Option<PendingTap>,
}

impl TapRecognizer {
    pub fn began(&mut self, now: Duration, touch: &Touch) {
        self.candidate = touch.on_card.then_some(TapCandidate {
            began_at: now,
            origin: touch.location,
            valid: true,
        });
    }

    pub fn moved(&mut self, touch: &Touch) {
        let Some(candidate) = self.candidate.as_mut() else {
            return;
        };
        if let (Some(origin), Some(location)) = (candidate.origin, touch.location) {
            if origin.distance(location) > TAP_SLOP {
                candidate.valid = false;
            }
        }
    }

    pub fn ended(&mut self, now: Duration, touch: &Touch) -> TapOutcome {
        let Some(candidate) = self.candidate.take() else {
            return TapOutcome::None;
        };
        let held = now.saturating_sub(candidate.began_at);
        if !candidate.valid || !touch.on_card || held > MAX_TAP_DURATION {
            return TapOutcome::None;
        }

        match self.pending.take() {
            Some(pending) if now.saturating_sub(pending.at) <= DOUBLE_TAP_WINDOW => {
                TapOutcome::DoubleTap {
                    cancelled: pending.timer,
                }
            }
            _ => TapOutcome::Candidate,
        }
    }

    pub fn cancelled(&mut self) {
        self.candidate = None;
    }

    /// Record the timer that will confirm the latest candidate.
    pub fn hold_single(&mut self, timer: AnimationId, at: Duration) {
        self.pending = Some(PendingTap { timer, at });
    }

    /// Called when a confirmation timer fires; true if it is still current.
    pub fn confirm_single(&mut self, timer: AnimationId) -> bool {
        match self.pending {
            Some(pending) if pending.timer == timer => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}
