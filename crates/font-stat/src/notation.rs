//! Parser for the axis value notation.
//!
//! ```text
//! axisTag[=displayName]; entry(,entry)* ( | axisTag[=displayName]; entry(,entry)* )*
//! entry := VALUE=name[*] | MIN:NOM:MAX=name[*] | VALUE>LINKED=name[*]
//! ```
//!
//! `VALUE` gives a format 1 point, `MIN:NOM:MAX` a format 2 range and
//! `VALUE>LINKED` a format 3 style link. A trailing `*` marks the value
//! elidable. Whitespace around tokens is ignored.

use std::collections::HashSet;

use log::warn;
use read_fonts::types::{Fixed, Tag};
use statforge_font_ops::{
    ValueFormat,
    axes::{make_tag, registered_axis, tag_str},
};

use crate::{
    error::ParseError,
    model::{AxisValueEntry, DesignAxis, ParsedAxis},
};

const AXIS_SEPARATOR: char = '|';
const ENTRY_SEPARATOR: char = ',';

/// Everything a lenient parse produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    /// Axes that parsed cleanly, in input order.
    pub axes: Vec<ParsedAxis>,
    /// One error per aborted axis.
    pub errors: Vec<ParseError>,
    /// Non-fatal notices, e.g. truncated tags.
    pub warnings: Vec<String>,
}

/// Parse one or more notation strings, failing on the first malformed axis.
pub fn parse_axis_values<I, S>(inputs: I) -> Result<Vec<ParsedAxis>, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let outcome = parse_axis_values_lenient(inputs);
    match outcome.errors.into_iter().next() {
        Some(error) => Err(error),
        None => Ok(outcome.axes),
    }
}

/// Parse one or more notation strings, keeping every axis that parses.
///
/// A malformed entry aborts its whole axis; sibling axes are kept.
pub fn parse_axis_values_lenient<I, S>(inputs: I) -> ParseOutcome
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut outcome = ParseOutcome::default();
    let mut seen = HashSet::new();

    for input in inputs {
        for chunk in input.as_ref().split(AXIS_SEPARATOR) {
            if chunk.trim().is_empty() {
                continue;
            }
            let ordering = outcome.axes.len() as u16;
            match parse_axis(chunk, ordering, &mut outcome.warnings) {
                Ok(axis) if !seen.insert(axis.axis.tag) => outcome.errors.push(ParseError::new(
                    "duplicate axis tag",
                    tag_str(axis.axis.tag),
                )),
                Ok(axis) => outcome.axes.push(axis),
                Err(error) => outcome.errors.push(error),
            }
        }
    }

    outcome
}

fn parse_axis(
    chunk: &str,
    ordering: u16,
    warnings: &mut Vec<String>,
) -> Result<ParsedAxis, ParseError> {
    let (head, body) = chunk
        .split_once(';')
        .ok_or_else(|| ParseError::new("missing ';' after axis tag", chunk.trim()))?;

    let (tag_text, display_name) = match head.split_once('=') {
        Some((tag, name)) => (tag.trim(), Some(name.trim())),
        None => (head.trim(), None),
    };
    let tag = parse_tag(tag_text, warnings)?;
    let name = match display_name {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => default_axis_name(tag),
    };

    let entries = body
        .split(ENTRY_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_entry)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ParsedAxis { axis: DesignAxis { tag, name, ordering }, entries })
}

fn parse_tag(text: &str, warnings: &mut Vec<String>) -> Result<Tag, ParseError> {
    if text.is_empty() {
        return Err(ParseError::new("missing axis tag", text));
    }
    let text = if text.chars().count() > 4 {
        let truncated: String = text.chars().take(4).collect();
        let warning = format!("axis tag '{text}' truncated to '{truncated}'");
        warn!("{warning}");
        warnings.push(warning);
        truncated
    } else {
        text.to_string()
    };
    make_tag(&text).ok_or_else(|| ParseError::new("invalid axis tag", text))
}

/// Registered axes get their standard name; custom axes are named by their tag.
pub fn default_axis_name(tag: Tag) -> String {
    registered_axis(tag).map_or_else(|| tag_str(tag), |axis| axis.name.to_string())
}

fn parse_entry(entry: &str) -> Result<AxisValueEntry, ParseError> {
    let (spec, name) = entry
        .split_once('=')
        .ok_or_else(|| ParseError::new("expected VALUE=name", entry))?;

    let name = name.trim();
    let (name, elidable) = match name.strip_suffix('*') {
        Some(stripped) => (stripped.trim_end(), true),
        None => (name, false),
    };
    if name.is_empty() {
        return Err(ParseError::new("missing name", entry));
    }

    let format = parse_value_spec(spec.trim())?;
    Ok(AxisValueEntry::new(name, elidable, format))
}

fn parse_value_spec(spec: &str) -> Result<ValueFormat, ParseError> {
    if spec.contains(':') {
        let parts: Vec<&str> = spec.split(':').collect();
        let [min, nominal, max] = parts[..] else {
            return Err(ParseError::new("expected MIN:NOM:MAX", spec));
        };
        let (min, nominal, max) =
            (parse_number(min, spec)?, parse_number(nominal, spec)?, parse_number(max, spec)?);
        if !(min <= nominal && nominal <= max) {
            return Err(ParseError::new("range must satisfy MIN <= NOM <= MAX", spec));
        }
        Ok(ValueFormat::Range { min, nominal, max })
    } else if let Some((value, linked)) = spec.split_once('>') {
        Ok(ValueFormat::StyleLink {
            value: parse_number(value, spec)?,
            linked: parse_number(linked, spec)?,
        })
    } else {
        Ok(ValueFormat::DiscretePoint { value: parse_number(spec, spec)? })
    }
}

/// Parse a number and snap it to the 16.16 grid it will be stored on.
fn parse_number(text: &str, spec: &str) -> Result<f64, ParseError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| Fixed::from_f64(v).to_f64())
        .ok_or_else(|| ParseError::new("malformed value", spec))
}
