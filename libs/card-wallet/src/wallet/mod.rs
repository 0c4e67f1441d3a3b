//! The card stack.
//!
//! A [`Wallet`] owns the order of its cards (last = frontmost), lays them out
//! as a fanned stack and turns card gestures into stack operations. Anything
//! that depends on an animation finishing runs in that animation's
//! continuation, and every [`WalletAction`] goes out only after the sequence
//! and layout it describes are in place.

pub mod layout;

use crate::animation::{AnimationSpec, Curve, Timeline};
use crate::card::{Card, CardId, STANDARD_FRAME};
use crate::config::WalletConfig;
use crate::error::{ConfigError, Result};
use crate::publisher::{Publisher, Subscription};
use crate::types::CardAction;
use kurbo::{Point, Rect};
use layout::Placement;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

const INSERT: AnimationSpec = AnimationSpec::linear(Duration::from_millis(300));
const REMOVE: AnimationSpec = AnimationSpec::new(Duration::from_millis(300), Curve::EaseIn);
const SWAP: AnimationSpec = AnimationSpec::linear(Duration::from_millis(300));

/// Events a wallet reports to its observers.
#[derive(Debug, Clone, PartialEq)]
pub enum WalletAction {
    /// This card is now the frontmost one.
    InFront(Card),
    TapCard(Card),
    DoubleTapCard(Card),
}

impl WalletAction {
    pub fn card(&self) -> &Card {
        match self {
            Self::InFront(card) | Self::TapCard(card) | Self::DoubleTapCard(card) => card,
        }
    }
}

struct WalletState {
    /// Stack order, back-most first.
    cards: VecDeque<Card>,
    /// Visual children in insertion order; later children draw on top of
    /// earlier ones at equal depth.
    children: Vec<Card>,
    max_showable_cards: usize,
    card_subscriptions: Vec<(CardId, Subscription)>,
    observers: Vec<Subscription>,
}

struct WalletInner {
    timeline: Timeline,
    frame: Rect,
    actions: Publisher<WalletAction>,
    state: RefCell<WalletState>,
}

/// Shared handle to a wallet.
#[derive(Clone)]
pub struct Wallet {
    inner: Rc<WalletInner>,
}

impl Wallet {
    /// Build a wallet over `cards` (last = frontmost) and lay them out.
    pub fn new(timeline: &Timeline, cards: Vec<Card>, config: WalletConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(timeline, cards, &config))
    }

    /// A wallet with the default configuration.
    pub fn with_cards(timeline: &Timeline, cards: Vec<Card>) -> Self {
        Self::build(timeline, cards, &WalletConfig::default())
    }

    fn build(timeline: &Timeline, cards: Vec<Card>, config: &WalletConfig) -> Self {
        let wallet = Self {
            inner: Rc::new(WalletInner {
                timeline: timeline.clone(),
                frame: config.frame(),
                actions: Publisher::new(),
                state: RefCell::new(WalletState {
                    cards: VecDeque::with_capacity(cards.len()),
                    children: Vec::with_capacity(cards.len()),
                    max_showable_cards: config.max_showable_cards,
                    card_subscriptions: Vec::with_capacity(cards.len()),
                    observers: Vec::new(),
                }),
            }),
        };

        for card in cards {
            if wallet.contains(&card) {
                tracing::warn!(card = %card.id(), "card listed twice, keeping first");
                continue;
            }
            let subscription = wallet.subscribe_to(&card);
            {
                let mut state = wallet.inner.state.borrow_mut();
                state.card_subscriptions.push((card.id(), subscription));
                state.cards.push_back(card.clone());
            }
            wallet.add_child(&card);
        }

        wallet.arrange_content();
        tracing::debug!(
            cards = wallet.len(),
            max_showable = config.max_showable_cards,
            "wallet created"
        );
        wallet
    }

    pub fn timeline(&self) -> &Timeline {
        &self.inner.timeline
    }

    /// The wallet's frame inside its container.
    pub fn frame(&self) -> Rect {
        self.inner.frame
    }

    /// The frontmost card, the only one that takes touches.
    pub fn selected_card(&self) -> Option<Card> {
        self.inner.state.borrow().cards.back().cloned()
    }

    /// Cards in stack order, back-most first.
    pub fn cards(&self) -> Vec<Card> {
        self.inner.state.borrow().cards.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.state.borrow().cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.state.borrow().cards.is_empty()
    }

    pub fn contains(&self, card: &Card) -> bool {
        self.inner.state.borrow().cards.contains(card)
    }

    /// Whether the card is currently one of the wallet's visual children.
    pub fn is_child(&self, card: &Card) -> bool {
        self.inner.state.borrow().children.contains(card)
    }

    pub fn max_showable_cards(&self) -> usize {
        self.inner.state.borrow().max_showable_cards
    }

    /// Change the visible window and lay the stack out again.
    pub fn set_max_showable_cards(&self, max_showable_cards: usize) -> Result<()> {
        if max_showable_cards == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        self.inner.state.borrow_mut().max_showable_cards = max_showable_cards;
        self.arrange_content();
        Ok(())
    }

    /// Shown cards in stack order.
    pub fn visible_cards(&self) -> Vec<Card> {
        self.inner
            .state
            .borrow()
            .cards
            .iter()
            .filter(|card| !card.is_hidden())
            .cloned()
            .collect()
    }

    /// Shown children back to front: by depth, then by child order.
    pub fn draw_order(&self) -> Vec<Card> {
        let mut children: Vec<Card> = self
            .inner
            .state
            .borrow()
            .children
            .iter()
            .filter(|card| !card.is_hidden())
            .cloned()
            .collect();
        children.sort_by(|a, b| a.z_position().total_cmp(&b.z_position()));
        children
    }

    /// The card a touch at `point` should go to. `point` is in the space card
    /// frames live in.
    ///
    /// Only the topmost shown card under the point is considered; if it does
    /// not take touches, nothing does.
    pub fn card_at(&self, point: Point) -> Option<Card> {
        self.draw_order()
            .into_iter()
            .rev()
            .find(|card| card.frame().contains(point))
            .filter(Card::accepts_touches)
    }

    /// Register an observer for every future wallet action.
    ///
    /// Observers stay registered for the wallet's lifetime.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&WalletAction) + 'static,
    {
        let subscription = self.inner.actions.subscribe(callback);
        self.inner.state.borrow_mut().observers.push(subscription);
    }

    /// Put `card` on top of the stack and announce it.
    pub fn add(&self, card: Card) {
        if self.contains(&card) {
            tracing::warn!(card = %card.id(), "card already in wallet");
            return;
        }

        let subscription = self.subscribe_to(&card);
        {
            let mut state = self.inner.state.borrow_mut();
            state.card_subscriptions.push((card.id(), subscription));
            state.cards.push_back(card.clone());
        }

        self.inner.timeline.animate(
            INSERT,
            || {
                self.add_child(&card);
                self.arrange_content();
            },
            || {},
        );

        tracing::debug!(card = %card.id(), cards = self.len(), "card added");
        self.emit(WalletAction::InFront(card));
    }

    /// Animate `card` out, then drop it from the stack.
    ///
    /// Removing a card the wallet does not hold changes nothing and emits
    /// nothing.
    pub fn remove(&self, card: &Card) {
        let wallet = Rc::downgrade(&self.inner);
        let removed = card.clone();

        self.inner.timeline.animate(
            REMOVE,
            || self.remove_child(card),
            move || {
                if let Some(wallet) = upgrade(&wallet) {
                    wallet.finish_remove(&removed);
                }
            },
        );
    }

    /// Bring `card` to the front of its siblings and flip it.
    pub fn flip(&self, card: &Card) {
        self.bring_child_to_front(card);
        card.flip();
    }

    /// Reset every card to the base anchor, then fan out the visible window.
    fn arrange_content(&self) {
        let base = layout::base_anchor(self.inner.frame);
        let (cards, max_showable) = {
            let state = self.inner.state.borrow();
            (
                state.cards.iter().cloned().collect::<Vec<_>>(),
                state.max_showable_cards,
            )
        };

        for card in &cards {
            card.set_hidden(false);
            card.set_center(base);
        }

        for (card, placement) in cards.iter().zip(layout::arrange(cards.len(), max_showable, base)) {
            match placement {
                Placement::Hidden => {
                    card.set_hidden(true);
                    card.set_interactive(false);
                }
                Placement::Shown(slot) => {
                    card.set_center(slot.center);
                    card.set_z_position(slot.z_position);
                    card.set_interactive(slot.interactive);
                }
            }
        }
    }

    fn subscribe_to(&self, card: &Card) -> Subscription {
        let wallet = Rc::downgrade(&self.inner);
        let handle = card.downgrade();

        card.subscribe(move |action| {
            let (Some(wallet), Some(card)) = (upgrade(&wallet), handle.upgrade()) else {
                return;
            };
            match action {
                CardAction::Swap => wallet.did_swap(&card),
                CardAction::Tap => wallet.emit(WalletAction::TapCard(card)),
                CardAction::DoubleTap => wallet.emit(WalletAction::DoubleTapCard(card)),
            }
        })
    }

    fn did_swap(&self, card: &Card) {
        let destination = self
            .inner
            .state
            .borrow()
            .cards
            .front()
            .map(Card::frame)
            .unwrap_or(STANDARD_FRAME);

        let wallet = Rc::downgrade(&self.inner);
        let swapped = card.clone();
        self.inner.timeline.animate(
            SWAP,
            || {
                card.set_frame(destination);
                card.set_z_position(0.0);
                card.set_interactive(false);
            },
            move || {
                if let Some(wallet) = upgrade(&wallet) {
                    wallet.finish_swap(&swapped);
                }
            },
        );
    }

    fn finish_swap(&self, card: &Card) {
        let rotated = {
            let mut state = self.inner.state.borrow_mut();
            match state.cards.iter().position(|candidate| candidate == card) {
                Some(index) => {
                    if let Some(card) = state.cards.remove(index) {
                        state.cards.push_front(card);
                    }
                    true
                }
                None => false,
            }
        };

        if rotated {
            tracing::debug!(card = %card.id(), "card sent to the back");
        } else {
            tracing::debug!(card = %card.id(), "swapped card left the wallet before rotation");
        }

        self.arrange_content();
        self.announce_front();
    }

    fn finish_remove(&self, card: &Card) {
        let subscription = {
            let mut state = self.inner.state.borrow_mut();
            let Some(index) = state.cards.iter().position(|candidate| candidate == card) else {
                tracing::debug!(card = %card.id(), "card not in wallet, nothing to remove");
                return;
            };
            state.cards.remove(index);
            let id = card.id();
            state
                .card_subscriptions
                .iter()
                .position(|(subscribed, _)| *subscribed == id)
                .map(|index| state.card_subscriptions.swap_remove(index).1)
        };
        drop(subscription);

        tracing::debug!(card = %card.id(), cards = self.len(), "card removed");
        self.arrange_content();
        self.announce_front();
    }

    fn announce_front(&self) {
        if let Some(front) = self.selected_card() {
            self.emit(WalletAction::InFront(front));
        }
    }

    fn add_child(&self, card: &Card) {
        let mut state = self.inner.state.borrow_mut();
        if !state.children.contains(card) {
            state.children.push(card.clone());
        }
    }

    fn remove_child(&self, card: &Card) {
        self.inner
            .state
            .borrow_mut()
            .children
            .retain(|child| child != card);
    }

    fn bring_child_to_front(&self, card: &Card) {
        let mut state = self.inner.state.borrow_mut();
        if let Some(index) = state.children.iter().position(|child| child == card) {
            let child = state.children.remove(index);
            state.children.push(child);
        }
    }

    fn emit(&self, action: WalletAction) {
        tracing::debug!(?action, "wallet action");
        self.inner.actions.emit(&action);
    }
}

fn upgrade(inner: &Weak<WalletInner>) -> Option<Wallet> {
    inner.upgrade().map(|inner| Wallet { inner })
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("Wallet")
            .field("frame", &self.inner.frame)
            .field("cards", &state.cards.len())
            .field("max_showable_cards", &state.max_showable_cards)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Background, CardContent, Color};
    use pretty_assertions::assert_eq;

    fn cards(timeline: &Timeline, count: usize) -> Vec<Card> {
        (0..count)
            .map(|index| {
                Card::standard(
                    timeline,
                    CardContent::single_title(format!("card {index}")),
                    Background::Color(Color::BLACK),
                )
            })
            .collect()
    }

    fn record(wallet: &Wallet) -> Rc<RefCell<Vec<WalletAction>>> {
        let actions = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&actions);
        wallet.subscribe(move |action| sink.borrow_mut().push(action.clone()));
        actions
    }

    #[test]
    fn test_new_rejects_zero_window() {
        let timeline = Timeline::new();
        let config = WalletConfig::default().with_max_showable_cards(0);
        assert!(matches!(
            Wallet::new(&timeline, Vec::new(), config),
            Err(ConfigError::ZeroWindow)
        ));
    }

    #[test]
    fn test_duplicate_initial_cards_are_kept_once() {
        let timeline = Timeline::new();
        let card = cards(&timeline, 1).remove(0);
        let wallet = Wallet::with_cards(&timeline, vec![card.clone(), card.clone()]);
        assert_eq!(wallet.len(), 1);
        assert!(card.is_interactive());
    }

    #[test]
    fn test_add_inside_animation_moves_card_gradually() {
        let timeline = Timeline::new();
        let wallet = Wallet::with_cards(&timeline, cards(&timeline, 2));
        let added = cards(&timeline, 1).remove(0);

        wallet.add(added.clone());
        let target = added.frame();
        assert_ne!(added.presentation().frame, target);

        timeline.advance(Duration::from_millis(300));
        assert_eq!(added.presentation().frame, target);
    }

    #[test]
    fn test_adding_twice_is_ignored() {
        let timeline = Timeline::new();
        let wallet = Wallet::with_cards(&timeline, cards(&timeline, 1));
        let actions = record(&wallet);
        let card = wallet.selected_card().unwrap();

        wallet.add(card);
        assert_eq!(wallet.len(), 1);
        assert!(actions.borrow().is_empty());
    }

    #[test]
    fn test_remove_detaches_visual_child_before_sequence() {
        let timeline = Timeline::new();
        let initial = cards(&timeline, 3);
        let wallet = Wallet::with_cards(&timeline, initial.clone());

        wallet.remove(&initial[1]);
        assert!(!wallet.is_child(&initial[1]));
        assert!(wallet.contains(&initial[1]));

        timeline.run_until_idle();
        assert!(!wallet.contains(&initial[1]));
        assert_eq!(wallet.cards(), vec![initial[0].clone(), initial[2].clone()]);
    }

    #[test]
    fn test_removing_last_card_emits_nothing() {
        let timeline = Timeline::new();
        let initial = cards(&timeline, 1);
        let wallet = Wallet::with_cards(&timeline, initial.clone());
        let actions = record(&wallet);

        wallet.remove(&initial[0]);
        timeline.run_until_idle();

        assert!(wallet.is_empty());
        assert_eq!(wallet.selected_card(), None);
        assert!(actions.borrow().is_empty());
    }

    #[test]
    fn test_removed_card_no_longer_drives_wallet() {
        let timeline = Timeline::new();
        let initial = cards(&timeline, 2);
        let wallet = Wallet::with_cards(&timeline, initial.clone());
        wallet.remove(&initial[1]);
        timeline.run_until_idle();
        assert_eq!(initial[1].subscriber_count(), 0);
        assert_eq!(initial[0].subscriber_count(), 1);
    }

    #[test]
    fn test_dropping_wallet_tears_down_card_subscriptions() {
        let timeline = Timeline::new();
        let initial = cards(&timeline, 3);
        let wallet = Wallet::with_cards(&timeline, initial.clone());
        assert!(initial.iter().all(|card| card.subscriber_count() == 1));

        drop(wallet);
        assert!(initial.iter().all(|card| card.subscriber_count() == 0));
    }

    #[test]
    fn test_flip_brings_card_to_front_of_siblings() {
        let timeline = Timeline::new();
        let initial = cards(&timeline, 3);
        let wallet = Wallet::with_cards(&timeline, initial.clone());
        for card in &initial {
            card.set_z_position(0.0);
        }

        wallet.flip(&initial[0]);
        assert_eq!(wallet.draw_order().last(), Some(&initial[0]));
        assert!(initial[0].is_back_visible());
        assert!(wallet.contains(&initial[0]));
        assert_eq!(wallet.cards(), initial);
    }

    #[test]
    fn test_card_at_only_reaches_frontmost_card() {
        let timeline = Timeline::new();
        let initial = cards(&timeline, 3);
        let wallet = Wallet::with_cards(&timeline, initial.clone());

        let front = &initial[2];
        assert_eq!(wallet.card_at(front.center()), Some(front.clone()));
        assert_eq!(wallet.card_at(Point::new(-500.0, -500.0)), None);

        front.set_interactive(false);
        assert_eq!(wallet.card_at(front.center()), None);
    }

    #[test]
    fn test_shrinking_and_growing_window() {
        let timeline = Timeline::new();
        let initial = cards(&timeline, 4);
        let wallet = Wallet::with_cards(&timeline, initial.clone());

        wallet.set_max_showable_cards(2).unwrap();
        assert_eq!(wallet.visible_cards(), initial[2..].to_vec());
        assert!(initial[0].is_hidden() && initial[1].is_hidden());

        wallet.set_max_showable_cards(3).unwrap();
        assert_eq!(wallet.visible_cards(), initial[1..].to_vec());

        assert_eq!(wallet.set_max_showable_cards(0), Err(ConfigError::ZeroWindow));
        assert_eq!(wallet.max_showable_cards(), 3);
    }

    #[test]
    fn test_observer_may_mutate_wallet_reentrantly() {
        let timeline = Timeline::new();
        let wallet = Wallet::with_cards(&timeline, cards(&timeline, 2));
        {
            let handle = wallet.clone();
            wallet.subscribe(move |action| {
                if let WalletAction::DoubleTapCard(card) = action {
                    handle.flip(card);
                }
            });
        }
        let front = wallet.selected_card().unwrap();
        wallet.emit(WalletAction::DoubleTapCard(front.clone()));
        assert!(front.is_flipped());
    }
}
