//! Axis descriptions as written in the notation, before names become IDs.

use read_fonts::types::Tag;
use statforge_font_ops::ValueFormat;

/// A variation axis declared for STAT.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignAxis {
    pub tag: Tag,
    pub name: String,
    /// Position in the design axis array; axis values refer to it.
    pub ordering: u16,
}

/// A named position (or range) on one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisValueEntry {
    pub name: String,
    pub elidable: bool,
    pub format: ValueFormat,
}

impl AxisValueEntry {
    pub fn new(name: impl Into<String>, elidable: bool, format: ValueFormat) -> Self {
        Self { name: name.into(), elidable, format }
    }
}

/// One axis with its values.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAxis {
    pub axis: DesignAxis,
    pub entries: Vec<AxisValueEntry>,
}

/// Replace axes of `existing` whose tag appears in `incoming`, append the rest.
///
/// Orderings are renumbered to match the merged positions.
pub fn merge_axes(existing: Vec<ParsedAxis>, incoming: Vec<ParsedAxis>) -> Vec<ParsedAxis> {
    let mut merged = existing;
    for axis in incoming {
        match merged.iter_mut().find(|a| a.axis.tag == axis.axis.tag) {
            Some(slot) => *slot = axis,
            None => merged.push(axis),
        }
    }
    for (ordering, axis) in merged.iter_mut().enumerate() {
        axis.axis.ordering = ordering as u16;
    }
    merged
}
