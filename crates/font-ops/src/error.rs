//! Error types for font table access.

use std::{io, path::PathBuf, result};

use read_fonts::{ReadError, types::NameId};
use write_fonts::BuilderError;

use crate::container::Flavor;

/// Errors that can occur while reading, mutating or saving a font binary.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to read a font file.
    #[error("failed to read font '{path}': {source}")]
    ReadFile { path: PathBuf, source: io::Error },

    /// Failed to write a font file.
    #[error("failed to write font '{path}': {source}")]
    WriteFile { path: PathBuf, source: io::Error },

    /// The file is not an sfnt container.
    #[error("'{path}' is not a valid font: {source}")]
    InvalidFont { path: PathBuf, source: ReadError },

    /// A WOFF or WOFF2 wrapper could not be decoded or encoded.
    #[error("invalid {flavor} data: {message}")]
    Container { flavor: Flavor, message: String },

    #[error("failed to parse font: {0}")]
    Parse(#[from] ReadError),

    /// A table is present but could not be parsed.
    #[error("failed to parse {table} table: {source}")]
    ReadTable { table: String, source: ReadError },

    /// A name ID was referenced but has no record.
    #[error("name ID {0} not found in name table")]
    NameNotFound(NameId),

    /// Every user-defined name ID is already taken.
    #[error("no free name ID left for '{0}'")]
    NameIdsExhausted(String),

    #[error("failed to build font: {0}")]
    Build(#[from] BuilderError),

    #[error("failed to write table: {0}")]
    Write(#[from] write_fonts::error::Error),
}

pub type Result<T> = result::Result<T, Error>;
