//! Headless demo screen for the card wallet.
//!
//! Builds the four starter cards, wires an observer the way a host screen
//! would, and plays a short scripted session against a virtual clock.

use std::time::Duration;

use anyhow::Context;
use card_wallet::{
    Background, Card, CardContent, Color, ImageRef, Timeline, Touch, Vec2, Wallet, WalletAction,
    WalletConfig,
};
use rand::Rng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Gap between the two touches of a scripted double tap.
const DOUBLE_TAP_GAP: Duration = Duration::from_millis(80);
const TAP_HOLD: Duration = Duration::from_millis(40);

pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WalletConfig::from_env().context("reading wallet configuration")?;
    tracing::info!(
        max_showable_cards = config.max_showable_cards,
        width = config.container_width,
        "starting sample wallet"
    );

    let timeline = Timeline::new();
    let mut screen = SampleScreen::new(&timeline, config)?;
    screen.run_session();

    tracing::info!(
        cards = screen.wallet().len(),
        elapsed_ms = timeline.now().as_millis() as u64,
        "session finished"
    );
    Ok(())
}

/// The starter deck, back-most first.
pub fn demo_cards(timeline: &Timeline) -> Vec<Card> {
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

/// A wallet plus the controls a demo screen offers.
pub struct SampleScreen {
    timeline: Timeline,
    wallet: Wallet,
    added: usize,
}

impl SampleScreen {
    pub fn new(timeline: &Timeline, config: WalletConfig) -> card_wallet::Result<Self> {
        let wallet = Wallet::new(timeline, demo_cards(timeline), config)?;

        wallet.subscribe(|action| match action {
            WalletAction::InFront(card) => tracing::info!(card = %card, "in front"),
            WalletAction::TapCard(card) => tracing::info!(card = %card, "tapped"),
            WalletAction::DoubleTapCard(card) => {
                tracing::info!(card = %card, "double tapped, flipping");
                card.flip();
            }
        });

        Ok(Self {
            timeline: timeline.clone(),
            wallet,
            added: 0,
        })
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    /// Add a numbered card in a random color and return it.
    pub fn add_card(&mut self) -> Card {
        self.added += 1;
        let mut rng = rand::rng();
        let color = Color::rgb(rng.random(), rng.random(), rng.random());

        let card = Card::standard(
            &self.timeline,
            CardContent::title(
                self.added.to_string(),
                format!("You've added {} card(s) already", self.added),
            ),
            Background::Color(color),
        );
        self.wallet.add(card.clone());
        card
    }

    /// Remove the frontmost card, if any.
    pub fn remove_card(&self) -> Option<Card> {
        let card = self.wallet.selected_card()?;
        self.wallet.remove(&card);
        Some(card)
    }

    /// Drag the frontmost card vertically by `dy` and release it.
    pub fn swipe_front(&self, dy: f64) -> Option<Card> {
        let card = self.wallet.selected_card()?;
        let start = card.center();
        let end = start + Vec2::new(0.0, dy);

        card.touches_began(&Touch::on_card(start));
        card.touches_moved(&Touch::on_card(end));
        card.touches_ended(&Touch::on_card(end));
        Some(card)
    }

    pub fn tap_front(&self) -> Option<Card> {
        let card = self.wallet.selected_card()?;
        let point = card.center();
        card.touches_began(&Touch::on_card(point));
        self.timeline.advance(TAP_HOLD);
        card.touches_ended(&Touch::on_card(point));
        Some(card)
    }

    pub fn double_tap_front(&self) -> Option<Card> {
        let card = self.tap_front()?;
        self.timeline.advance(DOUBLE_TAP_GAP);
        self.tap_front();
        Some(card)
    }

    /// Let every running transition and pending tap finish.
    pub fn settle(&self) {
        self.timeline.run_until_idle();
    }

    /// Tap, swipe, flip, add and remove, settling after each step.
    pub fn run_session(&mut self) {
        self.tap_front();
        self.settle();

        self.swipe_front(250.0);
        self.settle();

        self.double_tap_front();
        self.settle();

        for _ in 0..2 {
            self.add_card();
            self.settle();
        }

        self.remove_card();
        self.settle();

        self.swipe_front(-80.0);
        self.settle();

        let order: Vec<String> = self.wallet.cards().iter().map(Card::to_string).collect();
        tracing::info!(?order, "stack after session");
    }
}
