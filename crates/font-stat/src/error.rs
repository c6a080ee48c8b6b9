//! Error types for STAT synthesis and repair.

use std::result;

/// Malformed axis value notation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}: '{token}'")]
pub struct ParseError {
    pub message: String,
    /// The offending substring.
    pub token: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>, token: impl Into<String>) -> Self {
        Self { message: message.into(), token: token.into() }
    }
}

/// Why a range rebuild left an axis alone. Reported as a warning, never fatal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoundsError {
    #[error("axis '{tag}' has {count} discrete value, at least 2 are needed to derive ranges")]
    TooFewPoints { tag: String, count: usize },

    #[error("axis '{tag}' already has range values")]
    HasRanges { tag: String },

    #[error("axis '{tag}' has a style-linked value at {value} that a range would cover")]
    HasStyleLinks { tag: String, value: f64 },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Font(#[from] statforge_font_ops::Error),
}

pub type Result<T> = result::Result<T, Error>;
