//! Core value types shared by cards and the wallet.

use std::fmt;

/// RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
    pub const DARK_GRAY: Self = Self::rgb(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0);
    pub const CLEAR: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Human readable name for the well-known constants, if this is one.
    pub fn name(&self) -> Option<&'static str> {
        const NAMED: [(Color, &str); 6] = [
            (Color::WHITE, "white"),
            (Color::BLACK, "black"),
            (Color::RED, "red"),
            (Color::BLUE, "blue"),
            (Color::DARK_GRAY, "dark gray"),
            (Color::CLEAR, "clear"),
        ];
        NAMED
            .iter()
            .find(|(color, _)| color == self)
            .map(|(_, name)| *name)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(
                f,
                "#{:02x}{:02x}{:02x}",
                channel(self.r),
                channel(self.g),
                channel(self.b)
            ),
        }
    }
}

fn channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Name of an image resource the host platform knows how to load.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Card background fill.
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    Color(Color),
    Image(ImageRef),
}

impl Background {
    /// Solid fill behind the faces; image backgrounds sit on white.
    pub fn color(&self) -> Color {
        match self {
            Self::Color(color) => *color,
            Self::Image(_) => Color::WHITE,
        }
    }

    pub fn image(&self) -> Option<&ImageRef> {
        match self {
            Self::Image(image) => Some(image),
            Self::Color(_) => None,
        }
    }
}

/// What a card displays.
#[derive(Debug, Clone, PartialEq)]
pub enum CardContent {
    SingleTitle(String),
    Title {
        title: String,
        subtitle: String,
    },
    Payment {
        /// Already masked by the caller, e.g. `••••-••••-••••-1234`.
        card_number: String,
        expiration: String,
        cvv: String,
        holder: String,
        icon: ImageRef,
    },
}

impl CardContent {
    pub fn single_title(text: impl Into<String>) -> Self {
        Self::SingleTitle(text.into())
    }

    pub fn title(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self::Title {
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }

    /// Whether the back face carries content.
    pub fn has_back(&self) -> bool {
        matches!(self, Self::Payment { .. })
    }
}

/// Discrete intents a card derives from touch input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardAction {
    Tap,
    DoubleTap,
    /// The card was flung far enough to be sent to the back of the stack.
    Swap,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_background_falls_back_to_white() {
        let background = Background::Image(ImageRef::named("visa_new"));
        assert_eq!(background.color(), Color::WHITE);
        assert_eq!(background.image().map(ImageRef::as_str), Some("visa_new"));
        assert_eq!(Background::Color(Color::RED).image(), None);
    }

    #[test]
    fn test_color_display_uses_names_then_hex() {
        assert_eq!(Color::BLUE.to_string(), "blue");
        assert_eq!(Color::DARK_GRAY.to_string(), "dark gray");
        assert_eq!(Color::rgb(1.0, 0.5, 0.0).to_string(), "#ff8000");
    }

    #[test]
    fn test_only_payment_cards_have_a_back() {
        assert!(!CardContent::single_title("Hi").has_back());
        assert!(!CardContent::title("Got it?", "Sub").has_back());
        let payment = CardContent::Payment {
            card_number: "••••-1234".to_string(),
            expiration: "12/29".to_string(),
            cvv: "321".to_string(),
            holder: "John Doe".to_string(),
            icon: ImageRef::named("visa_new"),
        };
        assert!(payment.has_back());
    }
}
