//! Axis spec notation: `tag[=Name]=min:default:max` or `tag[=Name]=*`, comma separated.

use read_fonts::types::{Fixed, Tag};
use statforge_font_ops::axes::make_tag;

use crate::error::{Error, Result};

/// How an axis gets its range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisSetting {
    Explicit { min: f64, default: f64, max: f64 },
    /// Detect the default from legacy metrics.
    Auto,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisSpec {
    pub tag: Tag,
    /// Display name; registered or existing names are used when absent.
    pub name: Option<String>,
    pub setting: AxisSetting,
}

/// Parse a comma-separated list of axis specs.
pub fn parse_axis_specs(input: &str) -> Result<Vec<AxisSpec>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_axis_spec)
        .collect()
}

fn invalid(spec: &str, message: &str) -> Error {
    Error::InvalidSpec { spec: spec.to_string(), message: message.to_string() }
}

pub fn parse_axis_spec(spec: &str) -> Result<AxisSpec> {
    let (head, setting) = spec
        .rsplit_once('=')
        .ok_or_else(|| invalid(spec, "expected tag=min:default:max or tag=*"))?;

    let (tag, name) = match head.split_once('=') {
        Some((tag, name)) => (tag.trim(), Some(name.trim().to_string()).filter(|n| !n.is_empty())),
        None => (head.trim(), None),
    };
    let tag = make_tag(tag).ok_or_else(|| invalid(spec, "axis tag must be 1-4 ASCII characters"))?;

    let setting = match setting.trim() {
        "*" => AxisSetting::Auto,
        range => {
            let values = range
                .split(':')
                .map(|v| v.trim().parse::<f64>().ok().filter(|v| v.is_finite()))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| invalid(spec, "malformed number"))?;
            let [min, default, max] = values[..] else {
                return Err(invalid(spec, "expected three values min:default:max"));
            };
            if !(min <= default && default <= max) {
                return Err(invalid(spec, "values must satisfy min <= default <= max"));
            }
            let snap = |v: f64| Fixed::from_f64(v).to_f64();
            AxisSetting::Explicit { min: snap(min), default: snap(default), max: snap(max) }
        }
    };

    Ok(AxisSpec { tag, name, setting })
}
