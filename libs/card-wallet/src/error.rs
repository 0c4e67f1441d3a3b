//! Error types for card-wallet.
//!
//! Gestures and stack mutations never fail; only wallet configuration can.

use thiserror::Error;

/// Result type alias using ConfigError.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while building or changing a wallet configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("max_showable_cards must be at least 1")]
    ZeroWindow,

    #[error("invalid {field}: {value} (must be finite and positive)")]
    InvalidDimension { field: &'static str, value: f64 },

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
