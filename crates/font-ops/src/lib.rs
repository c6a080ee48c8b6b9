//! Font binary access for STAT/fvar/name synthesis.
//!
//! A [`FontHandle`] owns the bytes of one font file (sfnt, WOFF or WOFF2).
//! Tables are read into typed models implementing [`TableModel`], mutated in
//! memory, staged back on the handle and written out in a single rewrite. A
//! [`NameRegistry`] travels alongside the handle and hands out deduplicated
//! name IDs.

pub mod axes;
pub mod container;
mod error;
mod handle;
mod names;
pub mod tables;

use read_fonts::FontRef;
use write_fonts::FontBuilder;

pub use container::Flavor;
pub use error::{Error, Result};
pub use handle::FontHandle;
pub use names::NameRegistry;
pub use tables::{
    TableModel,
    fvar::{FvarAxis, FvarInstance, FvarTable},
    name::{NameEntry, NameTable},
    stat::{StatAxis, StatAxisValue, StatTable, ValueFormat, ValueLocation},
};

/// Rewrite font data by applying a transformation function.
///
/// Copies all tables from the source font, then calls `f` to modify or add tables.
/// The function receives a reference to the source font and a mutable builder
/// that already contains all original tables.
pub fn rewrite_font(
    data: &[u8],
    f: impl FnOnce(&FontRef, &mut FontBuilder) -> Result<()>,
) -> Result<Vec<u8>> {
    let font = FontRef::new(data)?;
    let mut builder = FontBuilder::new();

    for record in font.table_directory.table_records() {
        let tag = record.tag();
        if let Some(table_data) = font.table_data(tag) {
            builder.add_raw(tag, table_data.as_bytes());
        }
    }

    f(&font, &mut builder)?;
    Ok(builder.build())
}
