//! Typed in-memory models of the tables this workspace rewrites.

pub mod fvar;
pub mod name;
pub mod stat;

use read_fonts::{FontData, ReadError, types::Tag};

use crate::error::Result;

/// A font table that can be read into memory, mutated and written back whole.
pub trait TableModel: Default + PartialEq + Sized {
    const TAG: Tag;

    /// Parse the model from raw table data.
    fn read(data: FontData<'_>) -> std::result::Result<Self, ReadError>;

    /// Compile the model to raw table data.
    fn write(&self) -> Result<Vec<u8>>;
}
