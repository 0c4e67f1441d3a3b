//! Shared fixtures for wallet scenario tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use card_wallet::{Background, Card, CardContent, Color, ImageRef, Timeline, Touch, Vec2, Wallet, WalletAction};

/// `count` plain title cards, oldest first.
pub fn numbered_cards(timeline: &Timeline, count: usize) -> Vec<Card> {
    (1..=count)
        .map(|number| {
            Card::standard(
                timeline,
                CardContent::title(format!("{number}"), format!("You've added {number} card(s) already")),
                Background::Color(Color::rgb(0.1 * number as f32, 0.2, 0.3)),
            )
        })
        .collect()
}

/// The four cards of the sample screen as `[A, B, C, D]`, D frontmost.
pub fn demo_deck(timeline: &Timeline) -> Vec<Card> {
    let payment = |number: &str, expiration: &str, cvv: &str| CardContent::Payment {
        card_number: number.to_string(),
        expiration: expiration.to_string(),
        cvv: cvv.to_string(),
        holder: "John Doe".to_string(),
        icon: ImageRef::named("visa_new"),
    };

    vec![
        Card::standard(
            timeline,
            payment("••••-••••-••••-4567", "01/25", "123"),
            Background::Color(Color::DARK_GRAY),
        ),
        Card::standard(
            timeline,
            payment("••••-••••-••••-1234", "12/29", "321"),
            Background::Color(Color::BLACK),
        ),
        Card::standard(
            timeline,
            CardContent::title("Got it?", "Now you can add your own cards!"),
            Background::Color(Color::RED),
        ),
        Card::standard(
            timeline,
            CardContent::single_title("Swipe to learn more!"),
            Background::Color(Color::BLUE),
        ),
    ]
}

/// Records every wallet action in order.
#[derive(Clone, Default)]
pub struct ActionLog {
    actions: Rc<RefCell<Vec<WalletAction>>>,
}

impl ActionLog {
    pub fn attach(wallet: &Wallet) -> Self {
        let log = Self::default();
        let sink = Rc::clone(&log.actions);
        wallet.subscribe(move |action| sink.borrow_mut().push(action.clone()));
        log
    }

    pub fn take(&self) -> Vec<WalletAction> {
        std::mem::take(&mut *self.actions.borrow_mut())
    }

    pub fn is_empty(&self) -> bool {
        self.actions.borrow().is_empty()
    }
}

/// Drag `card` vertically by `dy` from its center and let go.
pub fn swipe(card: &Card, dy: f64) {
    let start = card.center();
    let end = start + Vec2::new(0.0, dy);
    card.touches_began(&Touch::on_card(start));
    card.touches_moved(&Touch::on_card(end));
    card.touches_ended(&Touch::on_card(end));
}

/// Touch `card` briefly without moving.
pub fn tap(card: &Card, timeline: &Timeline) {
    let point = card.center();
    card.touches_began(&Touch::on_card(point));
    timeline.advance(Duration::from_millis(40));
    card.touches_ended(&Touch::on_card(point));
}

pub fn double_tap(card: &Card, timeline: &Timeline) {
    tap(card, timeline);
    timeline.advance(Duration::from_millis(60));
    tap(card, timeline);
}
