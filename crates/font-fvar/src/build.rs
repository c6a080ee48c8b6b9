//! fvar axis and named instance synthesis.

use std::fmt;

use log::{info, warn};
use read_fonts::types::{Fixed, NameId};
use statforge_font_ops::{
    FontHandle, FvarAxis, FvarInstance, FvarTable, NameRegistry,
    axes::{legal_range, registered_axis, tag_str},
};

use crate::{
    error::{Error, Result},
    legacy::detect_default,
    spec::{AxisSetting, AxisSpec},
};

const DEFAULT_STYLE_NAME: &str = "Regular";

#[derive(Debug, Clone, Default)]
pub struct FvarOptions {
    /// Subfamily name for the synthesized instance.
    pub style_name: Option<String>,
}

/// Outcome of an fvar build.
#[derive(Debug, Default)]
pub struct FvarReport {
    /// Tags of the axes that were added or updated.
    pub axes: Vec<String>,
    /// Axes left out because no default could be found.
    pub skipped: Vec<Error>,
    /// Subfamily name of the synthesized instance.
    pub instance: Option<String>,
    pub changed: bool,
}

impl fmt::Display for FvarReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fvar: axes {}", self.axes.join(", "))?;
        if let Some(instance) = &self.instance {
            write!(f, ", instance '{instance}'")?;
        }
        if !self.skipped.is_empty() {
            write!(f, " ({} skipped)", self.skipped.len())?;
        }
        Ok(())
    }
}

/// Add or update the axes in `specs` and name the instance at their defaults.
///
/// Axes not mentioned in `specs` and unrelated instances are kept. An auto
/// axis whose default cannot be detected is skipped with a warning.
pub fn build_fvar(
    handle: &mut FontHandle,
    names: &mut NameRegistry,
    specs: &[AxisSpec],
    options: &FvarOptions,
) -> Result<FvarReport> {
    let mut fvar: FvarTable = handle.table_or_default()?;
    let mut report = FvarReport::default();

    for spec in specs {
        let (min, default, max) = match resolve_range(handle, spec, &fvar) {
            Ok(range) => range,
            Err(err @ Error::NotFound { .. }) => {
                warn!("{}: {err}, axis skipped", handle.path().display());
                report.skipped.push(err);
                continue;
            }
            Err(err) => return Err(err),
        };

        match fvar.axis_index(spec.tag) {
            Some(index) => {
                let axis = &mut fvar.axes[index];
                if let Some(name) = &spec.name {
                    axis.name_id = names.resolve(name)?;
                }
                (axis.min, axis.default, axis.max) = (min, default, max);
            }
            None => {
                let name = match &spec.name {
                    Some(name) => name.clone(),
                    None => registered_axis(spec.tag)
                        .map_or_else(|| tag_str(spec.tag), |axis| axis.name.to_string()),
                };
                fvar.axes.push(FvarAxis {
                    tag: spec.tag,
                    min,
                    default,
                    max,
                    flags: 0,
                    name_id: names.resolve(&name)?,
                });
                for instance in &mut fvar.instances {
                    instance.coordinates.push(default);
                }
            }
        }
        report.axes.push(tag_str(spec.tag));
    }

    if !fvar.axes.is_empty() {
        let style_name = subfamily_name(handle, names, options);
        name_default_instance(&mut fvar, names, &style_name)?;
        report.instance = Some(style_name);
    }

    report.changed = handle.stage(&fvar)?;
    if report.changed {
        info!("{}: fvar now has {} axes", handle.path().display(), fvar.axes.len());
    }
    Ok(report)
}

/// `(min, default, max)` for a spec, clamped to the axis's legal range.
fn resolve_range(
    handle: &FontHandle,
    spec: &AxisSpec,
    fvar: &FvarTable,
) -> Result<(f64, f64, f64)> {
    let (lo, hi) = legal_range(spec.tag);
    let clamp = |v: f64| Fixed::from_f64(v.clamp(lo, hi)).to_f64();

    match spec.setting {
        AxisSetting::Explicit { min, default, max } => Ok((clamp(min), clamp(default), clamp(max))),
        AxisSetting::Auto => {
            let font = handle.font()?;
            let default = clamp(detect_default(&font, handle.path(), spec.tag)?);
            Ok(match fvar.axis(spec.tag) {
                Some(axis) => (axis.min.min(default), default, axis.max.max(default)),
                None => (default, default, default),
            })
        }
    }
}

/// Explicit name, then the font's typographic or regular subfamily, then the
/// file name suffix after the last `-`, then "Regular".
fn subfamily_name(handle: &FontHandle, names: &NameRegistry, options: &FvarOptions) -> String {
    if let Some(name) = options.style_name.as_deref().filter(|n| !n.trim().is_empty()) {
        return name.trim().to_string();
    }
    for name_id in [NameId::TYPOGRAPHIC_SUBFAMILY_NAME, NameId::SUBFAMILY_NAME] {
        if let Ok(name) = names.get_string(name_id)
            && !name.is_empty()
        {
            return name.to_string();
        }
    }
    handle
        .path()
        .file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.rsplit_once('-'))
        .map(|(_, suffix)| suffix.to_string())
        .filter(|suffix| !suffix.is_empty())
        .unwrap_or_else(|| DEFAULT_STYLE_NAME.to_string())
}

/// Point the instance at the default location to `style_name`, adding one if none exists.
fn name_default_instance(
    fvar: &mut FvarTable,
    names: &mut NameRegistry,
    style_name: &str,
) -> Result<()> {
    let defaults: Vec<f64> = fvar.axes.iter().map(|axis| axis.default).collect();
    let subfamily_name_id = names.resolve(style_name)?;
    let postscript_name_id =
        names.contains(NameId::POSTSCRIPT_NAME).then_some(NameId::POSTSCRIPT_NAME);

    let at_default = |instance: &FvarInstance| {
        instance.coordinates.len() == defaults.len()
            && instance
                .coordinates
                .iter()
                .zip(&defaults)
                .all(|(a, b)| Fixed::from_f64(*a) == Fixed::from_f64(*b))
    };

    match fvar.instances.iter().position(at_default) {
        Some(index) => {
            let instance = &mut fvar.instances[index];
            instance.subfamily_name_id = subfamily_name_id;
            if postscript_name_id.is_some() {
                instance.postscript_name_id = postscript_name_id;
            }
        }
        None => fvar.instances.push(FvarInstance {
            subfamily_name_id,
            flags: 0,
            coordinates: defaults,
            postscript_name_id,
        }),
    }
    Ok(())
}
