//! The `STAT` table model.
//!
//! Axis values are kept in their original order. Single-axis values carry a
//! [`ValueFormat`] so format-specific fields can only exist on the right
//! variant; format 4 values are carried through unchanged.

use read_fonts::{
    FontData, FontRead, ReadError,
    tables::stat as read_stat,
    types::{Fixed, NameId, Tag},
};
use write_fonts::tables::stat::{
    AxisRecord, AxisValue, AxisValueRecord, AxisValueTableFlags, Stat,
};

use super::TableModel;
use crate::error::Result;

/// The position a single-axis value names.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueFormat {
    /// Format 1: a single named position.
    DiscretePoint { value: f64 },
    /// Format 2: a named closed interval with a representative value.
    Range { min: f64, nominal: f64, max: f64 },
    /// Format 3: a named position linked to its style-linked counterpart.
    StyleLink { value: f64, linked: f64 },
}

impl ValueFormat {
    /// The coordinate this value stands for on its axis.
    pub fn coordinate(&self) -> f64 {
        match *self {
            ValueFormat::DiscretePoint { value } => value,
            ValueFormat::Range { nominal, .. } => nominal,
            ValueFormat::StyleLink { value, .. } => value,
        }
    }

    /// The STAT axis value format number.
    pub fn format(&self) -> u16 {
        match self {
            ValueFormat::DiscretePoint { .. } => 1,
            ValueFormat::Range { .. } => 2,
            ValueFormat::StyleLink { .. } => 3,
        }
    }
}

/// Where an axis value sits in the design space.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueLocation {
    /// Formats 1-3.
    Axis { axis_index: u16, format: ValueFormat },
    /// Format 4: `(axis index, value)` pairs.
    Combination(Vec<(u16, f64)>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatAxisValue {
    pub flags: AxisValueTableFlags,
    pub name_id: NameId,
    pub location: ValueLocation,
}

impl StatAxisValue {
    pub fn single(axis_index: u16, format: ValueFormat, name_id: NameId, elidable: bool) -> Self {
        let mut flags = AxisValueTableFlags::empty();
        if elidable {
            flags |= AxisValueTableFlags::ELIDABLE_AXIS_VALUE_NAME;
        }
        Self { flags, name_id, location: ValueLocation::Axis { axis_index, format } }
    }

    /// Axis index and format for single-axis values.
    pub fn axis(&self) -> Option<(u16, ValueFormat)> {
        match self.location {
            ValueLocation::Axis { axis_index, format } => Some((axis_index, format)),
            ValueLocation::Combination(_) => None,
        }
    }

    pub fn is_elidable(&self) -> bool {
        self.flags.contains(AxisValueTableFlags::ELIDABLE_AXIS_VALUE_NAME)
    }

    pub fn set_elidable(&mut self) {
        self.flags |= AxisValueTableFlags::ELIDABLE_AXIS_VALUE_NAME;
    }

    fn from_read(value: read_stat::AxisValue) -> Self {
        use read_stat::AxisValue::*;

        let (flags, name_id, location) = match value {
            Format1(v) => (
                v.flags(),
                v.value_name_id(),
                ValueLocation::Axis {
                    axis_index: v.axis_index(),
                    format: ValueFormat::DiscretePoint { value: v.value().to_f64() },
                },
            ),
            Format2(v) => (
                v.flags(),
                v.value_name_id(),
                ValueLocation::Axis {
                    axis_index: v.axis_index(),
                    format: ValueFormat::Range {
                        min: v.range_min_value().to_f64(),
                        nominal: v.nominal_value().to_f64(),
                        max: v.range_max_value().to_f64(),
                    },
                },
            ),
            Format3(v) => (
                v.flags(),
                v.value_name_id(),
                ValueLocation::Axis {
                    axis_index: v.axis_index(),
                    format: ValueFormat::StyleLink {
                        value: v.value().to_f64(),
                        linked: v.linked_value().to_f64(),
                    },
                },
            ),
            Format4(v) => (
                v.flags(),
                v.value_name_id(),
                ValueLocation::Combination(
                    v.axis_values()
                        .iter()
                        .map(|record| (record.axis_index(), record.value().to_f64()))
                        .collect(),
                ),
            ),
        };

        Self { flags: AxisValueTableFlags::from_bits_truncate(flags.bits()), name_id, location }
    }

    fn to_write(&self) -> AxisValue {
        let (flags, name_id) = (self.flags, self.name_id);
        match &self.location {
            ValueLocation::Axis { axis_index, format } => match *format {
                ValueFormat::DiscretePoint { value } => {
                    AxisValue::format_1(*axis_index, flags, name_id, Fixed::from_f64(value))
                }
                ValueFormat::Range { min, nominal, max } => AxisValue::format_2(
                    *axis_index,
                    flags,
                    name_id,
                    Fixed::from_f64(nominal),
                    Fixed::from_f64(min),
                    Fixed::from_f64(max),
                ),
                ValueFormat::StyleLink { value, linked } => AxisValue::format_3(
                    *axis_index,
                    flags,
                    name_id,
                    Fixed::from_f64(value),
                    Fixed::from_f64(linked),
                ),
            },
            ValueLocation::Combination(values) => AxisValue::format_4(
                flags,
                name_id,
                values
                    .iter()
                    .map(|&(axis_index, value)| {
                        AxisValueRecord::new(axis_index, Fixed::from_f64(value))
                    })
                    .collect(),
            ),
        }
    }
}

/// A design axis record.
#[derive(Debug, Clone, PartialEq)]
pub struct StatAxis {
    pub tag: Tag,
    pub name_id: NameId,
    pub ordering: u16,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatTable {
    pub design_axes: Vec<StatAxis>,
    pub axis_values: Vec<StatAxisValue>,
    pub elided_fallback_name_id: Option<NameId>,
}

impl StatTable {
    /// Index of the design axis with this tag.
    pub fn axis_index(&self, tag: Tag) -> Option<u16> {
        self.design_axes.iter().position(|a| a.tag == tag).map(|i| i as u16)
    }

    /// Single-axis values on `axis_index`, with their positions in `axis_values`.
    pub fn values_on_axis(
        &self,
        axis_index: u16,
    ) -> impl Iterator<Item = (usize, ValueFormat)> + '_ {
        self.axis_values.iter().enumerate().filter_map(move |(i, v)| match v.axis() {
            Some((index, format)) if index == axis_index => Some((i, format)),
            _ => None,
        })
    }
}

impl TableModel for StatTable {
    const TAG: Tag = Tag::new(b"STAT");

    fn read(data: FontData<'_>) -> std::result::Result<Self, ReadError> {
        let stat = read_stat::Stat::read(data)?;

        let design_axes = stat
            .design_axes()?
            .iter()
            .map(|a| StatAxis {
                tag: a.axis_tag(),
                name_id: a.axis_name_id(),
                ordering: a.axis_ordering(),
            })
            .collect();

        let mut axis_values = Vec::new();
        if let Some(array) = stat.offset_to_axis_values().transpose()? {
            for value in array.axis_values().iter() {
                axis_values.push(StatAxisValue::from_read(value?));
            }
        }

        Ok(Self {
            design_axes,
            axis_values,
            elided_fallback_name_id: stat.elided_fallback_name_id(),
        })
    }

    fn write(&self) -> Result<Vec<u8>> {
        let design_axes = self
            .design_axes
            .iter()
            .map(|a| AxisRecord::new(a.tag, a.name_id, a.ordering))
            .collect();
        let axis_values = self.axis_values.iter().map(StatAxisValue::to_write).collect();

        // Fall back to the font subfamily name, as instancers do
        let elided = self.elided_fallback_name_id.unwrap_or(NameId::SUBFAMILY_NAME);
        Ok(write_fonts::dump_table(&Stat::new(design_axes, axis_values, elided))?)
    }
}
