//! Operations applied to one font file in a single open/save cycle.

use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use statforge_font_fvar::{AxisSpec, FvarOptions, build_fvar, parse_axis_specs};
use statforge_font_ops::{FontHandle, NameRegistry};
use statforge_font_stat::{
    ParseError, ParsedAxis, merge_stat, normalize, parse_axis_values_lenient, synthesize_stat,
    upgrade_discrete_to_ranges,
};

use crate::config::ExportSettings;

/// One pass over a font.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Rebuild STAT from parsed axes, optionally keeping unmentioned axes.
    ///
    /// `warnings` holds what the notation parser noticed, reported with every file.
    Stat { axes: Vec<ParsedAxis>, merge: bool, warnings: Vec<String> },
    UpgradeRanges,
    Normalize,
    Fvar { specs: Vec<AxisSpec>, options: FvarOptions },
}

impl Operation {
    /// Parse notation into a STAT operation. Any malformed axis is an error.
    pub fn stat<S: AsRef<str>>(values: &[S], merge: bool) -> Result<Self, ParseError> {
        let outcome = parse_axis_values_lenient(values);
        if let Some(error) = outcome.errors.into_iter().next() {
            return Err(error);
        }
        Ok(Operation::Stat { axes: outcome.axes, merge, warnings: outcome.warnings })
    }

    /// Run on `handle`, returning a summary and any warnings.
    fn apply(
        &self,
        handle: &mut FontHandle,
        names: &mut NameRegistry,
    ) -> Result<(String, Vec<String>)> {
        Ok(match self {
            Operation::Stat { axes, merge, warnings } => {
                let summary = if *merge {
                    merge_stat(handle, names, axes.clone())?
                } else {
                    synthesize_stat(handle, names, axes)?
                };
                (summary.to_string(), warnings.clone())
            }
            Operation::UpgradeRanges => {
                let report = upgrade_discrete_to_ranges(handle)?;
                let warnings = report.warnings.iter().map(ToString::to_string).collect();
                (report.to_string(), warnings)
            }
            Operation::Normalize => (normalize(handle, names)?.to_string(), Vec::new()),
            Operation::Fvar { specs, options } => {
                let report = build_fvar(handle, names, specs, options)?;
                let warnings = report.skipped.iter().map(ToString::to_string).collect();
                (report.to_string(), warnings)
            }
        })
    }
}

/// Turn export settings into operations, fvar first so later passes see its bounds.
///
/// Notation is parsed here, before any font is opened.
pub fn plan(settings: &ExportSettings) -> Result<Vec<Operation>> {
    let mut operations = Vec::new();

    if let Some(fvar_axes) = &settings.fvar_axes {
        operations.push(Operation::Fvar {
            specs: parse_axis_specs(fvar_axes)?,
            options: FvarOptions { style_name: settings.style_name.clone() },
        });
    }
    if !settings.axis_values.is_empty() {
        operations.push(Operation::stat(&settings.axis_values, settings.merge_stat)?);
    }
    if settings.upgrade_ranges {
        operations.push(Operation::UpgradeRanges);
    }
    if settings.normalize {
        operations.push(Operation::Normalize);
    }
    Ok(operations)
}

/// What happened to one file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    /// Whether the file was rewritten.
    pub changed: bool,
    /// One summary per operation.
    pub summaries: Vec<String>,
    /// Non-fatal problems, in the order the operations met them.
    pub warnings: Vec<String>,
}

/// Open `path`, run `operations` in order and save if anything changed.
///
/// Any error leaves the file untouched.
pub fn process_file(path: &Path, operations: &[Operation]) -> Result<Outcome> {
    let mut handle = FontHandle::open(path)?;
    let mut names = NameRegistry::load(&handle)?;

    let mut outcome = Outcome::default();
    for operation in operations {
        let (summary, warnings) = operation.apply(&mut handle, &mut names)?;
        outcome.summaries.push(summary);
        outcome.warnings.extend(warnings);
    }
    names.commit(&mut handle)?;

    outcome.changed =
        handle.save().with_context(|| format!("Failed to save {}", path.display()))?;
    if outcome.changed {
        info!("{}: saved {:?}", path.display(), handle.modified_tables());
    }
    Ok(outcome)
}
