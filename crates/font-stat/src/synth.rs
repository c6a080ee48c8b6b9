//! Building a whole STAT table from parsed axes.

use std::fmt;

use log::info;
use read_fonts::types::NameId;
use statforge_font_ops::{FontHandle, NameRegistry, StatAxis, StatAxisValue, StatTable};

use crate::{
    error::Result,
    model::{ParsedAxis, merge_axes},
    serialize::stat_to_axes,
};

/// What a synthesis run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct StatSummary {
    pub axes: usize,
    pub values: usize,
    /// Whether the table differs from the font's original STAT.
    pub changed: bool,
}

impl fmt::Display for StatSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "STAT: {} axes, {} axis values", self.axes, self.values)
    }
}

/// Turn parsed axes into a STAT table, naming everything through `names`.
///
/// Axis values reference their axis by its position in `axes`.
pub fn build_stat(
    axes: &[ParsedAxis],
    names: &mut NameRegistry,
    elided_fallback_name_id: NameId,
) -> Result<StatTable> {
    let mut design_axes = Vec::with_capacity(axes.len());
    let mut axis_values = Vec::new();

    for (index, parsed) in axes.iter().enumerate() {
        design_axes.push(StatAxis {
            tag: parsed.axis.tag,
            name_id: names.resolve(&parsed.axis.name)?,
            ordering: parsed.axis.ordering,
        });
        for entry in &parsed.entries {
            let name_id = names.resolve(&entry.name)?;
            axis_values.push(StatAxisValue::single(
                index as u16,
                entry.format,
                name_id,
                entry.elidable,
            ));
        }
    }

    Ok(StatTable {
        design_axes,
        axis_values,
        elided_fallback_name_id: Some(elided_fallback_name_id),
    })
}

/// Replace the font's STAT with one built from `axes`.
///
/// An existing elided fallback name is kept; otherwise the subfamily name is used.
/// New names stay in `names` until the registry is committed.
pub fn synthesize_stat(
    handle: &mut FontHandle,
    names: &mut NameRegistry,
    axes: &[ParsedAxis],
) -> Result<StatSummary> {
    let fallback = handle
        .table::<StatTable>()?
        .and_then(|stat| stat.elided_fallback_name_id)
        .unwrap_or(NameId::SUBFAMILY_NAME);

    let stat = build_stat(axes, names, fallback)?;
    let changed = handle.stage(&stat)?;
    if changed {
        info!(
            "{}: STAT rebuilt with {} axes",
            handle.path().display(),
            stat.design_axes.len()
        );
    }

    Ok(StatSummary { axes: stat.design_axes.len(), values: stat.axis_values.len(), changed })
}

/// Like [`synthesize_stat`], but axes of the existing STAT that `axes` does
/// not mention are kept.
pub fn merge_stat(
    handle: &mut FontHandle,
    names: &mut NameRegistry,
    axes: Vec<ParsedAxis>,
) -> Result<StatSummary> {
    let existing = stat_to_axes(&handle.table_or_default()?, names)?;
    let merged = merge_axes(existing, axes);
    synthesize_stat(handle, names, &merged)
}
