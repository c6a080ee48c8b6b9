//! In-place STAT repairs: canonical "Regular" naming and format 1/3 de-duplication.

use std::fmt;

use log::info;
use read_fonts::types::Fixed;
use statforge_font_ops::{FontHandle, NameRegistry, StatTable, ValueFormat, axes::normal_value};

use crate::error::Result;

const REGULAR: &str = "Regular";

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NormalizeReport {
    /// Values renamed to "Regular" or newly marked elidable.
    pub renamed: usize,
    /// Format 1 values dropped in favour of a format 3 value.
    pub removed: usize,
}

impl fmt::Display for NormalizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "normalized: {} renamed, {} duplicates removed", self.renamed, self.removed)
    }
}

fn same_coordinate(a: f64, b: f64) -> bool {
    Fixed::from_f64(a) == Fixed::from_f64(b)
}

/// Name every value at its axis's normal coordinate "Regular" and mark it elidable.
///
/// Returns how many values changed. "Regular" is only added to the name
/// table when some value needs it.
pub fn retarget_regular(stat: &mut StatTable, names: &mut NameRegistry) -> Result<usize> {
    let mut targets = Vec::new();
    for (axis_index, axis) in stat.design_axes.iter().enumerate() {
        let normal = normal_value(axis.tag);
        targets.extend(
            stat.values_on_axis(axis_index as u16)
                .filter(|(_, format)| same_coordinate(format.coordinate(), normal))
                .map(|(i, _)| i),
        );
    }
    if targets.is_empty() {
        return Ok(0);
    }

    let regular = names.resolve(REGULAR)?;
    let mut renamed = 0;
    for i in targets {
        let value = &mut stat.axis_values[i];
        if value.name_id != regular || !value.is_elidable() {
            value.name_id = regular;
            value.set_elidable();
            renamed += 1;
        }
    }
    Ok(renamed)
}

/// Drop format 1 values that share axis and value with a format 3 value.
///
/// Returns how many values were removed.
pub fn dedupe_linked_points(stat: &mut StatTable) -> usize {
    let linked: Vec<(u16, f64)> = stat
        .axis_values
        .iter()
        .filter_map(|v| match v.axis() {
            Some((axis_index, ValueFormat::StyleLink { value, .. })) => Some((axis_index, value)),
            _ => None,
        })
        .collect();

    let before = stat.axis_values.len();
    stat.axis_values.retain(|v| match v.axis() {
        Some((axis_index, ValueFormat::DiscretePoint { value })) => !linked
            .iter()
            .any(|&(index, linked)| index == axis_index && same_coordinate(linked, value)),
        _ => true,
    });
    before - stat.axis_values.len()
}

/// Apply [`retarget_regular`] to the font's STAT.
pub fn normalize_regular(handle: &mut FontHandle, names: &mut NameRegistry) -> Result<usize> {
    let mut stat: StatTable = handle.table_or_default()?;
    let renamed = retarget_regular(&mut stat, names)?;
    handle.stage(&stat)?;
    Ok(renamed)
}

/// Apply [`dedupe_linked_points`] to the font's STAT.
pub fn remove_linked_duplicates(handle: &mut FontHandle) -> Result<usize> {
    let mut stat: StatTable = handle.table_or_default()?;
    let removed = dedupe_linked_points(&mut stat);
    handle.stage(&stat)?;
    Ok(removed)
}

/// De-duplicate, then apply canonical naming.
pub fn normalize(handle: &mut FontHandle, names: &mut NameRegistry) -> Result<NormalizeReport> {
    let mut stat: StatTable = handle.table_or_default()?;
    let removed = dedupe_linked_points(&mut stat);
    let renamed = retarget_regular(&mut stat, names)?;
    if handle.stage(&stat)? {
        info!("{}: STAT normalized", handle.path().display());
    }
    Ok(NormalizeReport { renamed, removed })
}
