//! Wallet configuration.

use crate::error::{ConfigError, Result};
use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// Environment variable for [`WalletConfig::max_showable_cards`].
pub const ENV_MAX_SHOWABLE_CARDS: &str = "WALLET_MAX_SHOWABLE_CARDS";
/// Environment variable for [`WalletConfig::container_width`].
pub const ENV_CONTAINER_WIDTH: &str = "WALLET_CONTAINER_WIDTH";
/// Environment variable for [`WalletConfig::height`].
pub const ENV_HEIGHT: &str = "WALLET_HEIGHT";
/// Environment variable for [`WalletConfig::top_offset`].
pub const ENV_TOP_OFFSET: &str = "WALLET_TOP_OFFSET";

/// Wallet window and geometry settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// How many of the most recent cards are shown at once.
    pub max_showable_cards: usize,
    /// Width of the hosting container (the wallet spans all of it).
    pub container_width: f64,
    pub height: f64,
    /// Vertical offset of the wallet from its container's origin.
    pub top_offset: f64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            max_showable_cards: 5,
            container_width: 390.0,
            height: 200.0,
            top_offset: 80.0,
        }
    }
}

impl WalletConfig {
    /// Default configuration sized to the given container width.
    pub fn for_container_width(container_width: f64) -> Self {
        Self {
            container_width,
            ..Self::default()
        }
    }

    /// Builder-style override of the visible window.
    pub fn with_max_showable_cards(mut self, max_showable_cards: usize) -> Self {
        self.max_showable_cards = max_showable_cards;
        self
    }

    /// Load overrides from `WALLET_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load overrides through an arbitrary key lookup; missing keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_MAX_SHOWABLE_CARDS) {
            config.max_showable_cards = parse_value(ENV_MAX_SHOWABLE_CARDS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_CONTAINER_WIDTH) {
            config.container_width = parse_value(ENV_CONTAINER_WIDTH, &raw)?;
        }
        if let Some(raw) = lookup(ENV_HEIGHT) {
            config.height = parse_value(ENV_HEIGHT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_TOP_OFFSET) {
            config.top_offset = parse_value(ENV_TOP_OFFSET, &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the layout cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.max_showable_cards == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        check_dimension("container_width", self.container_width)?;
        check_dimension("height", self.height)?;
        if !self.top_offset.is_finite() {
            return Err(ConfigError::InvalidDimension {
                field: "top_offset",
                value: self.top_offset,
            });
        }
        Ok(())
    }

    /// The wallet's frame inside its container.
    pub fn frame(&self) -> Rect {
        Rect::new(
            0.0,
            self.top_offset,
            self.container_width,
            self.top_offset + self.height,
        )
    }
}

fn check_dimension(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDimension { field, value })
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
    })
}
