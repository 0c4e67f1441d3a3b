//! Front and back face layouts derived from a card's content.
//!
//! Faces are plain descriptions; the host toolkit turns labels into text
//! runs and loads icons by name.

use crate::types::{CardContent, Color, ImageRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Medium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlignment {
    Leading,
    Center,
    Trailing,
}

/// A single line (or wrapping block) of text on a face.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub font_size: f64,
    pub weight: FontWeight,
    pub alignment: TextAlignment,
    /// `None` means wrap without limit.
    pub max_lines: Option<u32>,
    pub color: Color,
}

impl Label {
    fn new(text: impl Into<String>, font_size: f64, weight: FontWeight) -> Self {
        Self {
            text: text.into(),
            font_size,
            weight,
            alignment: TextAlignment::Center,
            max_lines: Some(1),
            color: Color::WHITE,
        }
    }

    fn unlimited(mut self) -> Self {
        self.max_lines = None;
        self
    }
}

/// Contents of one side of a card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardFace {
    pub axis: Axis,
    pub labels: Vec<Label>,
    pub icon: Option<ImageRef>,
}

impl CardFace {
    pub fn empty() -> Self {
        Self {
            axis: Axis::Vertical,
            labels: Vec::new(),
            icon: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.icon.is_none()
    }

    /// The visible side of a card before any flip.
    pub fn front(content: &CardContent) -> Self {
        match content {
            CardContent::SingleTitle(text) => Self {
                axis: Axis::Horizontal,
                labels: vec![Label::new(text.as_str(), 12.0, FontWeight::Medium)],
                icon: None,
            },
            CardContent::Title { title, subtitle } => Self {
                axis: Axis::Vertical,
                labels: vec![
                    Label::new(title.as_str(), 12.0, FontWeight::Medium),
                    Label::new(subtitle.as_str(), 10.0, FontWeight::Regular).unlimited(),
                ],
                icon: None,
            },
            CardContent::Payment {
                card_number,
                expiration,
                holder,
                icon,
                ..
            } => Self {
                axis: Axis::Vertical,
                labels: vec![
                    Label::new(card_number.as_str(), 12.0, FontWeight::Medium),
                    Label::new(expiration.as_str(), 11.0, FontWeight::Regular),
                    Label::new(holder.as_str(), 10.0, FontWeight::Regular),
                ],
                icon: Some(icon.clone()),
            },
        }
    }

    /// The side revealed by a flip. Only payment cards put anything here.
    pub fn back(content: &CardContent) -> Self {
        match content {
            CardContent::Payment { cvv, .. } => Self {
                axis: Axis::Vertical,
                labels: vec![Label::new(format!("CVV: {cvv}"), 8.0, FontWeight::Regular)],
                icon: None,
            },
            _ => Self::empty(),
        }
    }
}
