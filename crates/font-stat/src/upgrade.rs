//! Rewriting discrete axis values (format 1) as contiguous ranges (format 2).

use std::fmt;

use log::{info, warn};
use statforge_font_ops::{
    FontHandle, FvarTable, StatTable, ValueFormat, ValueLocation, axes::tag_str,
};

use crate::error::{BoundsError, Result};

/// Outcome of a range upgrade.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpgradeReport {
    /// Tags of the axes whose values were rewritten.
    pub upgraded: Vec<String>,
    /// Axes left alone, and why.
    pub warnings: Vec<BoundsError>,
}

impl fmt::Display for UpgradeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.upgraded.is_empty() {
            write!(f, "ranges: nothing to upgrade")
        } else {
            write!(f, "ranges: upgraded {}", self.upgraded.join(", "))
        }
    }
}

/// `(min, nominal, max)` for each of `values`, which must be sorted.
///
/// Neighbours meet at their midpoint. The outer ends extend to `bounds`
/// when given, otherwise they stop at the first and last value.
pub fn discrete_ranges(values: &[f64], bounds: Option<(f64, f64)>) -> Vec<(f64, f64, f64)> {
    let last = values.len().saturating_sub(1);
    values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let min = if i == 0 {
                bounds.map_or(value, |(lo, _)| value.min(lo))
            } else {
                (values[i - 1] + value) / 2.0
            };
            let max = if i == last {
                bounds.map_or(value, |(_, hi)| value.max(hi))
            } else {
                (value + values[i + 1]) / 2.0
            };
            (min, value, max)
        })
        .collect()
}

/// Upgrade every eligible axis of `stat` in place.
///
/// Name IDs, flags and positions of the rewritten values are kept. Bounds
/// come from the matching `fvar` axis when there is one.
pub fn upgrade_stat(stat: &mut StatTable, fvar: Option<&FvarTable>) -> UpgradeReport {
    let mut report = UpgradeReport::default();

    for (axis_index, axis) in stat.design_axes.iter().enumerate() {
        let tag = tag_str(axis.tag);
        let on_axis: Vec<_> = stat.values_on_axis(axis_index as u16).collect();

        let mut points: Vec<(usize, f64)> = on_axis
            .iter()
            .filter_map(|&(i, format)| match format {
                ValueFormat::DiscretePoint { value } => Some((i, value)),
                _ => None,
            })
            .collect();
        let has_ranges = on_axis.iter().any(|(_, f)| matches!(f, ValueFormat::Range { .. }));
        let linked = on_axis.iter().find_map(|&(_, format)| match format {
            ValueFormat::StyleLink { value, .. } => Some(value),
            _ => None,
        });

        let problem = match (points.len(), linked) {
            (0, _) => continue,
            _ if has_ranges => BoundsError::HasRanges { tag },
            (_, Some(value)) => BoundsError::HasStyleLinks { tag, value },
            (1, None) => BoundsError::TooFewPoints { tag, count: 1 },
            (_, None) => {
                points.sort_by(|a, b| a.1.total_cmp(&b.1));
                let values: Vec<f64> = points.iter().map(|&(_, v)| v).collect();
                let bounds = fvar.and_then(|fvar| fvar.bounds(axis.tag));

                for (&(i, _), (min, nominal, max)) in
                    points.iter().zip(discrete_ranges(&values, bounds))
                {
                    stat.axis_values[i].location = ValueLocation::Axis {
                        axis_index: axis_index as u16,
                        format: ValueFormat::Range { min, nominal, max },
                    };
                }
                info!("{tag}: {} discrete values upgraded to ranges", points.len());
                report.upgraded.push(tag);
                continue;
            }
        };

        warn!("{problem}");
        report.warnings.push(problem);
    }

    report
}

/// Upgrade the font's STAT using its own `fvar` for bounds.
///
/// A font without `fvar` uses the discrete values themselves as bounds.
pub fn upgrade_discrete_to_ranges(handle: &mut FontHandle) -> Result<UpgradeReport> {
    let mut stat: StatTable = handle.table_or_default()?;
    let fvar: Option<FvarTable> = handle.table()?;

    let report = upgrade_stat(&mut stat, fvar.as_ref());
    handle.stage(&stat)?;
    Ok(report)
}
