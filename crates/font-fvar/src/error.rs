//! Error types for fvar synthesis.

/// Result type for fvar synthesis.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed axis spec, e.g. `wght=100:400`.
    #[error("Invalid axis spec '{spec}': {message}")]
    InvalidSpec { spec: String, message: String },

    /// No legacy metric could supply an auto-detected default.
    #[error("No default for axis '{tag}': {tried}")]
    NotFound { tag: String, tried: String },

    /// Font access error.
    #[error("{0}")]
    Font(#[from] statforge_font_ops::Error),
}
