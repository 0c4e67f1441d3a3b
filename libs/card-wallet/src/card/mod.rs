//! A single swipeable, flippable card.
//!
//! A card knows its own geometry, faces and drag/tap state and turns touches
//! into [`CardAction`]s. It knows nothing about stacks; whoever subscribes
//! decides what a swap means.

pub mod gesture;

pub use gesture::Touch;

use crate::animation::{Animated, AnimationId, AnimationSpec, Curve, Timeline};
use crate::face::CardFace;
use crate::publisher::{Publisher, Subscription};
use crate::types::{Background, CardAction, CardContent};
use gesture::{DragTracker, EndOutcome, MoveOutcome, TapOutcome, TapRecognizer, DOUBLE_TAP_WINDOW};
use kurbo::{Point, Rect, Size, Vec2};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};
use std::time::Duration;
use uuid::Uuid;

pub const STANDARD_SIZE: Size = Size::new(280.0, 200.0);
pub const STANDARD_FRAME: Rect = Rect::new(0.0, 0.0, 280.0, 200.0);
pub const CORNER_RADIUS: f64 = 4.0;

/// Scale applied while a card is being dragged.
pub const POP_SCALE: f64 = 1.1;

const POP: AnimationSpec = AnimationSpec::new(Duration::from_millis(200), Curve::EaseInOut);
const RESET: AnimationSpec = AnimationSpec::new(Duration::from_millis(100), Curve::EaseInOut);
const RESTORE: AnimationSpec = AnimationSpec::linear(Duration::from_millis(200));
const FLIP: AnimationSpec = AnimationSpec::new(Duration::from_millis(300), Curve::EaseInOut);

/// Stable identifier for logging and host-side bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardId(Uuid);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Interpolated values a renderer should draw right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardPresentation {
    pub frame: Rect,
    pub scale: f64,
    pub z_position: f64,
    pub hidden: bool,
    pub front_visible: bool,
    pub back_visible: bool,
    /// 0.0 shows the front, 1.0 the back; in between is mid-turn.
    pub flip_progress: f64,
}

struct CardState {
    frame: Animated<Rect>,
    scale: Animated<f64>,
    flip_progress: Animated<f64>,
    z_position: f64,
    hidden: bool,
    interactive: bool,
    flipped: bool,
    drag: DragTracker,
    taps: TapRecognizer,
}

struct CardInner {
    id: CardId,
    content: CardContent,
    background: Background,
    front: CardFace,
    back: CardFace,
    timeline: Timeline,
    actions: Publisher<CardAction>,
    state: RefCell<CardState>,
}

/// Shared handle to a card. Equality is identity: two cards with the same
/// content are still different cards.
#[derive(Clone)]
pub struct Card {
    inner: Rc<CardInner>,
}

/// Non-owning handle to a card.
#[derive(Clone)]
pub struct WeakCard {
    inner: Weak<CardInner>,
}

impl WeakCard {
    pub fn upgrade(&self) -> Option<Card> {
        self.inner.upgrade().map(|inner| Card { inner })
    }
}

impl fmt::Debug for WeakCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakCard")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl Card {
    /// Build a card ready to display, with gesture recognition attached.
    pub fn new(timeline: &Timeline, frame: Rect, content: CardContent, background: Background) -> Self {
        let front = CardFace::front(&content);
        let back = CardFace::back(&content);

        let card = Self {
            inner: Rc::new(CardInner {
                id: CardId(Uuid::new_v4()),
                content,
                background,
                front,
                back,
                timeline: timeline.clone(),
                actions: Publisher::new(),
                state: RefCell::new(CardState {
                    frame: Animated::new(frame),
                    scale: Animated::new(1.0),
                    flip_progress: Animated::new(0.0),
                    z_position: 0.0,
                    hidden: false,
                    interactive: true,
                    flipped: false,
                    drag: DragTracker::default(),
                    taps: TapRecognizer::default(),
                }),
            }),
        };
        tracing::trace!(card = %card.id(), "card created");
        card
    }

    /// A card of [`STANDARD_SIZE`] at the origin.
    pub fn standard(timeline: &Timeline, content: CardContent, background: Background) -> Self {
        Self::new(timeline, STANDARD_FRAME, content, background)
    }

    pub fn id(&self) -> CardId {
        self.inner.id
    }

    pub fn content(&self) -> &CardContent {
        &self.inner.content
    }

    pub fn background(&self) -> &Background {
        &self.inner.background
    }

    pub fn front(&self) -> &CardFace {
        &self.inner.front
    }

    pub fn back(&self) -> &CardFace {
        &self.inner.back
    }

    pub fn downgrade(&self) -> WeakCard {
        WeakCard {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Listen to this card's taps, double taps and swaps.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&CardAction) + 'static,
    {
        self.inner.actions.subscribe(callback)
    }

    /// How many listeners this card's action stream currently has.
    pub fn subscriber_count(&self) -> usize {
        self.inner.actions.subscriber_count()
    }

    pub fn frame(&self) -> Rect {
        self.inner.state.borrow().frame.target()
    }

    /// Animatable when called inside [`Timeline::animate`].
    pub fn set_frame(&self, frame: Rect) {
        let (now, spec) = self.transition();
        self.inner.state.borrow_mut().frame.set(frame, now, spec);
    }

    pub fn center(&self) -> Point {
        self.frame().center()
    }

    /// Move the card so its center lands on `center`, keeping its size.
    pub fn set_center(&self, center: Point) {
        let size = self.frame().size();
        self.set_frame(Rect::from_center_size(center, size));
    }

    pub fn scale(&self) -> f64 {
        self.inner.state.borrow().scale.target()
    }

    fn set_scale(&self, scale: f64) {
        let (now, spec) = self.transition();
        self.inner.state.borrow_mut().scale.set(scale, now, spec);
    }

    pub fn z_position(&self) -> f64 {
        self.inner.state.borrow().z_position
    }

    pub fn set_z_position(&self, z_position: f64) {
        self.inner.state.borrow_mut().z_position = z_position;
    }

    pub fn is_hidden(&self) -> bool {
        self.inner.state.borrow().hidden
    }

    pub fn set_hidden(&self, hidden: bool) {
        self.inner.state.borrow_mut().hidden = hidden;
    }

    pub fn is_interactive(&self) -> bool {
        self.inner.state.borrow().interactive
    }

    pub fn set_interactive(&self, interactive: bool) {
        self.inner.state.borrow_mut().interactive = interactive;
    }

    pub fn is_flipped(&self) -> bool {
        self.inner.state.borrow().flipped
    }

    pub fn is_front_visible(&self) -> bool {
        !self.is_flipped()
    }

    pub fn is_back_visible(&self) -> bool {
        self.is_flipped()
    }

    pub fn is_dragging(&self) -> bool {
        self.inner.state.borrow().drag.is_tracking()
    }

    /// Whether the card would receive touches routed to it.
    pub fn accepts_touches(&self) -> bool {
        let state = self.inner.state.borrow();
        state.interactive && !state.hidden
    }

    pub fn presentation(&self) -> CardPresentation {
        let now = self.inner.timeline.now();
        let state = self.inner.state.borrow();
        CardPresentation {
            frame: state.frame.value_at(now),
            scale: state.scale.value_at(now),
            z_position: state.z_position,
            hidden: state.hidden,
            front_visible: !state.flipped,
            back_visible: state.flipped,
            flip_progress: state.flip_progress.value_at(now),
        }
    }

    /// Turn the card over with a short transition.
    ///
    /// Front and back visibility swap together; the flip state belongs to
    /// this card alone.
    pub fn flip(&self) {
        self.inner.timeline.animate(
            FLIP,
            || {
                let (now, spec) = self.transition();
                let mut state = self.inner.state.borrow_mut();
                state.flipped = !state.flipped;
                let turned = if state.flipped { 1.0 } else { 0.0 };
                state.flip_progress.set(turned, now, spec);
                tracing::debug!(card = %self.inner.id, flipped = state.flipped, "card flipped");
            },
            || {},
        );
    }

    pub fn touches_began(&self, touch: &Touch) {
        if !self.accepts_touches() {
            tracing::trace!(card = %self.id(), "touch ignored by inactive card");
            return;
        }
        let now = self.inner.timeline.now();
        let mut state = self.inner.state.borrow_mut();
        let frame = state.frame.target();
        state.drag.began(frame, touch);
        state.taps.began(now, touch);
        tracing::trace!(card = %self.inner.id, location = ?touch.location, "touch began");
    }

    pub fn touches_moved(&self, touch: &Touch) {
        let outcome = {
            let mut state = self.inner.state.borrow_mut();
            state.taps.moved(touch);
            state.drag.moved(touch)
        };

        match outcome {
            MoveOutcome::Ignored => {}
            MoveOutcome::Translate(delta) => {
                self.pop();
                self.translate(delta);
            }
            MoveOutcome::Abort { original_frame } => {
                tracing::warn!(card = %self.id(), "touch lost its coordinates, aborting drag");
                self.restore(original_frame);
            }
        }
    }

    pub fn touches_ended(&self, touch: &Touch) {
        let now = self.inner.timeline.now();
        let (drag, tap) = {
            let mut state = self.inner.state.borrow_mut();
            (state.drag.ended(touch), state.taps.ended(now, touch))
        };

        // The pop is undone on every release, including after an aborted drag.
        self.reset();
        match drag {
            EndOutcome::Idle => {}
            EndOutcome::Swap => {
                tracing::debug!(card = %self.id(), "swap gesture recognized");
                self.emit(CardAction::Swap);
            }
            EndOutcome::Restore { original_frame } => self.restore(original_frame),
        }

        match tap {
            TapOutcome::None => {}
            TapOutcome::Candidate => self.hold_single_tap(now),
            TapOutcome::DoubleTap { cancelled } => {
                self.inner.timeline.cancel(cancelled);
                self.emit(CardAction::DoubleTap);
            }
        }
    }

    pub fn touches_cancelled(&self, _touch: &Touch) {
        let original_frame = {
            let mut state = self.inner.state.borrow_mut();
            state.taps.cancelled();
            state.drag.cancelled()
        };
        self.reset();
        if let Some(original_frame) = original_frame {
            self.restore(original_frame);
        }
    }

    fn transition(&self) -> (Duration, Option<AnimationSpec>) {
        (self.inner.timeline.now(), self.inner.timeline.current_spec())
    }

    fn translate(&self, delta: Vec2) {
        let frame = self.frame();
        self.set_frame(frame + delta);
    }

    fn pop(&self) {
        self.inner.timeline.animate(POP, || self.set_scale(POP_SCALE), || {});
    }

    fn reset(&self) {
        self.inner.timeline.animate(RESET, || self.set_scale(1.0), || {});
    }

    fn restore(&self, original_frame: Rect) {
        self.inner
            .timeline
            .animate(RESTORE, || self.set_frame(original_frame), || {});
    }

    fn hold_single_tap(&self, now: Duration) {
        let slot: Rc<Cell<Option<AnimationId>>> = Rc::default();
        let timer = {
            let slot = Rc::clone(&slot);
            let card = self.downgrade();
            self.inner.timeline.after(DOUBLE_TAP_WINDOW, move || {
                if let (Some(card), Some(timer)) = (card.upgrade(), slot.get()) {
                    card.confirm_single_tap(timer);
                }
            })
        };
        slot.set(Some(timer));
        self.inner.state.borrow_mut().taps.hold_single(timer, now);
    }

    fn confirm_single_tap(&self, timer: AnimationId) {
        let confirmed = self.inner.state.borrow_mut().taps.confirm_single(timer);
        if confirmed {
            self.emit(CardAction::Tap);
        }
    }

    fn emit(&self, action: CardAction) {
        tracing::trace!(card = %self.id(), ?action, "card action");
        self.inner.actions.emit(&action);
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Card {}

impl Hash for Card {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Card")
            .field("id", &self.inner.id)
            .field("content", &self.inner.content)
            .field("frame", &self.frame())
            .finish()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.background {
            Background::Color(color) => write!(f, "{color} card"),
            Background::Image(image) => write!(f, "{} card", image.as_str()),
        }
    }
}
