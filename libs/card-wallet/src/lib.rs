//! Swipeable, stackable wallet of cards.
//!
//! Provides:
//! - [`Card`]: a flippable card that turns touches into taps, double taps and swaps
//! - [`Wallet`]: a fanned stack of cards with a visible window and its own action stream
//! - [`Timeline`]: the single-threaded clock that drives transitions and their continuations
//! - [`Publisher`]: push-based event streams with drop-to-unsubscribe tokens
//!
//! The crate is toolkit-agnostic. A host feeds touches in, advances the
//! timeline once per frame and draws each card's [`CardPresentation`].

pub mod animation;
pub mod card;
pub mod config;
pub mod error;
pub mod face;
pub mod publisher;
pub mod types;
pub mod wallet;

pub use animation::{AnimationId, AnimationSpec, Curve, Timeline};
pub use card::{Card, CardId, CardPresentation, Touch, WeakCard, STANDARD_FRAME, STANDARD_SIZE};
pub use config::WalletConfig;
pub use error::{ConfigError, Result};
pub use face::{CardFace, Label};
pub use publisher::{Publisher, Subscription};
pub use types::{Background, CardAction, CardContent, Color, ImageRef};
pub use wallet::{Wallet, WalletAction};

pub use kurbo::{Point, Rect, Size, Vec2};
