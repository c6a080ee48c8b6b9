//! STAT table back to axis value notation.

use log::warn;
use read_fonts::types::Fixed;
use statforge_font_ops::{NameRegistry, StatTable, ValueFormat, axes::tag_str};

use crate::{
    error::Result,
    model::{AxisValueEntry, DesignAxis, ParsedAxis},
    notation::default_axis_name,
};

/// Characters that cannot appear in a name written to the notation.
const RESERVED: &[char] = &['|', ';', ',', '='];

/// Read every single-axis value of `stat` back into parsed form, in design axis order.
///
/// Combination (format 4) values have no notation and are skipped with a warning.
pub fn stat_to_axes(stat: &StatTable, names: &NameRegistry) -> Result<Vec<ParsedAxis>> {
    let skipped = stat.axis_values.iter().filter(|v| v.axis().is_none()).count();
    if skipped > 0 {
        warn!("skipping {skipped} format 4 axis value(s) with no notation");
    }

    let mut axes = Vec::with_capacity(stat.design_axes.len());
    for (index, design_axis) in stat.design_axes.iter().enumerate() {
        let name = match names.get_string(design_axis.name_id) {
            Ok(name) => name.to_string(),
            Err(_) => default_axis_name(design_axis.tag),
        };

        let entries = stat
            .values_on_axis(index as u16)
            .map(|(i, format)| -> Result<AxisValueEntry> {
                let value = &stat.axis_values[i];
                let name = names.get_string(value.name_id)?;
                Ok(AxisValueEntry::new(name, value.is_elidable(), format))
            })
            .collect::<Result<Vec<_>>>()?;

        axes.push(ParsedAxis {
            axis: DesignAxis { tag: design_axis.tag, name, ordering: index as u16 },
            entries,
        });
    }
    Ok(axes)
}

/// Write parsed axes as one notation string, axes joined by `|`.
pub fn axes_to_notation(axes: &[ParsedAxis]) -> String {
    axes.iter().map(axis_to_notation).collect::<Vec<_>>().join(" | ")
}

/// The notation describing `stat`.
pub fn stat_to_notation(stat: &StatTable, names: &NameRegistry) -> Result<String> {
    Ok(axes_to_notation(&stat_to_axes(stat, names)?))
}

fn axis_to_notation(parsed: &ParsedAxis) -> String {
    let tag = tag_str(parsed.axis.tag);
    let head = if parsed.axis.name == default_axis_name(parsed.axis.tag) {
        tag
    } else {
        format!("{tag}={}", checked_name(&parsed.axis.name))
    };

    let entries = parsed
        .entries
        .iter()
        .map(|entry| {
            let spec = match entry.format {
                ValueFormat::DiscretePoint { value } => format_fixed(value),
                ValueFormat::Range { min, nominal, max } => {
                    format!("{}:{}:{}", format_fixed(min), format_fixed(nominal), format_fixed(max))
                }
                ValueFormat::StyleLink { value, linked } => {
                    format!("{}>{}", format_fixed(value), format_fixed(linked))
                }
            };
            let star = if entry.elidable { "*" } else { "" };
            format!("{spec}={}{star}", checked_name(&entry.name))
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!("{head}; {entries}")
}

fn checked_name(name: &str) -> &str {
    if name.contains(RESERVED) {
        warn!("name '{name}' contains a notation separator and will not parse back");
    }
    name
}

/// Shortest decimal that reads back as the same 16.16 value.
pub fn format_fixed(value: f64) -> String {
    let fixed = Fixed::from_f64(value);
    let exact = fixed.to_f64();
    for precision in 0..=6 {
        let text = format!("{exact:.precision$}");
        if let Ok(parsed) = text.parse::<f64>()
            && Fixed::from_f64(parsed) == fixed
        {
            return if parsed == 0.0 { "0".to_string() } else { text };
        }
    }
    exact.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use read_fonts::types::{NameId, Tag};
    use statforge_font_ops::{NameTable, StatAxis, StatAxisValue, ValueLocation};
    use write_fonts::tables::stat::AxisValueTableFlags;

    #[test]
    fn format_fixed_is_shortest() {
        assert_eq!(format_fixed(400.0), "400");
        assert_eq!(format_fixed(62.5), "62.5");
        assert_eq!(format_fixed(-0.0), "0");
        let third = Fixed::from_f64(1.0 / 3.0).to_f64();
        let text = format_fixed(third);
        assert_eq!(Fixed::from_f64(text.parse().unwrap()), Fixed::from_f64(third));
        assert!(text.len() <= 8, "{text}");
    }

    #[test]
    fn serializes_every_format() {
        let mut table = NameTable::default();
        table.insert(NameId::new(256), "Weight");
        table.insert(NameId::new(257), "Light");
        table.insert(NameId::new(258), "Regular");
        table.insert(NameId::new(259), "Slanted");
        table.insert(NameId::new(260), "Sl");
        let names = NameRegistry::from_table(table);

        let stat = StatTable {
            design_axes: vec![
                StatAxis { tag: Tag::new(b"wght"), name_id: NameId::new(256), ordering: 0 },
                StatAxis { tag: Tag::new(b"slnt"), name_id: NameId::new(260), ordering: 1 },
            ],
            axis_values: vec![
                StatAxisValue::single(
                    0,
                    ValueFormat::Range { min: 100.0, nominal: 300.0, max: 350.0 },
                    NameId::new(257),
                    false,
                ),
                StatAxisValue::single(
                    0,
                    ValueFormat::StyleLink { value: 400.0, linked: 700.0 },
                    NameId::new(258),
                    true,
                ),
                StatAxisValue::single(
                    1,
                    ValueFormat::DiscretePoint { value: -12.0 },
                    NameId::new(259),
                    false,
                ),
                StatAxisValue {
                    flags: AxisValueTableFlags::empty(),
                    name_id: NameId::new(258),
                    location: ValueLocation::Combination(vec![(0, 400.0), (1, 0.0)]),
                },
            ],
            elided_fallback_name_id: None,
        };

        assert_eq!(
            stat_to_notation(&stat, &names).unwrap(),
            "wght; 100:300:350=Light, 400>700=Regular* | slnt=Sl; -12=Slanted"
        );
    }

    #[test]
    fn missing_value_name_is_an_error() {
        let names = NameRegistry::from_table(NameTable::default());
        let stat = StatTable {
            design_axes: vec![StatAxis {
                tag: Tag::new(b"wght"),
                name_id: NameId::new(256),
                ordering: 0,
            }],
            axis_values: vec![StatAxisValue::single(
                0,
                ValueFormat::DiscretePoint { value: 400.0 },
                NameId::new(300),
                false,
            )],
            elided_fallback_name_id: None,
        };
        assert!(stat_to_axes(&stat, &names).is_err());
    }
}
