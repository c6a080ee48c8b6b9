//! The `fvar` table model.

use read_fonts::{
    FontData, FontRead, ReadError,
    types::{Fixed, NameId, Tag},
};
use write_fonts::tables::fvar::{AxisInstanceArrays, Fvar, InstanceRecord, VariationAxisRecord};

use super::TableModel;
use crate::error::Result;

/// Name ID meaning "no PostScript name" for instances in a table where others have one.
const NO_POSTSCRIPT_NAME: NameId = NameId::new(0xFFFF);

#[derive(Debug, Clone, PartialEq)]
pub struct FvarAxis {
    pub tag: Tag,
    pub min: f64,
    pub default: f64,
    pub max: f64,
    pub flags: u16,
    pub name_id: NameId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FvarInstance {
    pub subfamily_name_id: NameId,
    pub flags: u16,
    /// One coordinate per axis, in axis order.
    pub coordinates: Vec<f64>,
    pub postscript_name_id: Option<NameId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FvarTable {
    pub axes: Vec<FvarAxis>,
    pub instances: Vec<FvarInstance>,
}

impl FvarTable {
    pub fn axis(&self, tag: Tag) -> Option<&FvarAxis> {
        self.axes.iter().find(|a| a.tag == tag)
    }

    pub fn axis_index(&self, tag: Tag) -> Option<usize> {
        self.axes.iter().position(|a| a.tag == tag)
    }

    /// `(min, max)` of the axis with this tag.
    pub fn bounds(&self, tag: Tag) -> Option<(f64, f64)> {
        self.axis(tag).map(|a| (a.min, a.max))
    }
}

impl TableModel for FvarTable {
    const TAG: Tag = Tag::new(b"fvar");

    fn read(data: FontData<'_>) -> std::result::Result<Self, ReadError> {
        let fvar = read_fonts::tables::fvar::Fvar::read(data)?;
        let arrays = fvar.axis_instance_arrays()?;

        let axes = arrays
            .axes()
            .iter()
            .map(|a| FvarAxis {
                tag: a.axis_tag(),
                min: a.min_value().to_f64(),
                default: a.default_value().to_f64(),
                max: a.max_value().to_f64(),
                flags: a.flags(),
                name_id: a.axis_name_id(),
            })
            .collect();

        let mut instances = Vec::new();
        for instance in arrays.instances().iter() {
            let instance = instance?;
            instances.push(FvarInstance {
                subfamily_name_id: instance.subfamily_name_id,
                flags: instance.flags,
                coordinates: instance.coordinates.iter().map(|c| c.get().to_f64()).collect(),
                postscript_name_id: instance.post_script_name_id,
            });
        }

        Ok(Self { axes, instances })
    }

    fn write(&self) -> Result<Vec<u8>> {
        let axes: Vec<VariationAxisRecord> = self
            .axes
            .iter()
            .map(|axis| VariationAxisRecord {
                axis_tag: axis.tag,
                min_value: Fixed::from_f64(axis.min),
                default_value: Fixed::from_f64(axis.default),
                max_value: Fixed::from_f64(axis.max),
                flags: axis.flags,
                axis_name_id: axis.name_id,
            })
            .collect();

        // All or none of the instances carry a PostScript name ID
        let any_postscript = self.instances.iter().any(|i| i.postscript_name_id.is_some());
        let instances: Vec<InstanceRecord> = self
            .instances
            .iter()
            .map(|instance| InstanceRecord {
                subfamily_name_id: instance.subfamily_name_id,
                flags: instance.flags,
                coordinates: instance.coordinates.iter().copied().map(Fixed::from_f64).collect(),
                post_script_name_id: any_postscript
                    .then(|| instance.postscript_name_id.unwrap_or(NO_POSTSCRIPT_NAME)),
            })
            .collect();

        let fvar = Fvar {
            axis_instance_arrays: AxisInstanceArrays { axes, instances }.into(),
        };
        Ok(write_fonts::dump_table(&fvar)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wght_fvar() -> FvarTable {
        FvarTable {
            axes: vec![FvarAxis {
                tag: Tag::new(b"wght"),
                min: 100.0,
                default: 400.0,
                max: 900.0,
                flags: 0,
                name_id: NameId::new(256),
            }],
            instances: vec![
                FvarInstance {
                    subfamily_name_id: NameId::new(2),
                    flags: 0,
                    coordinates: vec![400.0],
                    postscript_name_id: Some(NameId::new(6)),
                },
                FvarInstance {
                    subfamily_name_id: NameId::new(257),
                    flags: 0,
                    coordinates: vec![700.0],
                    postscript_name_id: None,
                },
            ],
        }
    }

    #[test]
    fn missing_postscript_ids_are_filled() {
        let bytes = wght_fvar().write().unwrap();
        let read = FvarTable::read(FontData::new(&bytes)).unwrap();
        assert_eq!(read.instances[0].postscript_name_id, Some(NameId::new(6)));
        // 0xFFFF reads back as no name
        assert_eq!(read.instances[1].postscript_name_id, None);
        assert_eq!(read.axes, wght_fvar().axes);

        // Every record still carries the PostScript field: 4 bytes per axis + 6
        let raw = read_fonts::tables::fvar::Fvar::read(FontData::new(&bytes)).unwrap();
        assert_eq!(raw.instance_size(), 4 * raw.axis_count() + 6);
    }

    #[test]
    fn instances_without_postscript_ids_stay_short() {
        let mut fvar = wght_fvar();
        for instance in &mut fvar.instances {
            instance.postscript_name_id = None;
        }
        let bytes = fvar.write().unwrap();
        let raw = read_fonts::tables::fvar::Fvar::read(FontData::new(&bytes)).unwrap();
        assert_eq!(raw.instance_size(), 4 * raw.axis_count() + 4);
    }

    #[test]
    fn bounds_by_tag() {
        let fvar = wght_fvar();
        assert_eq!(fvar.bounds(Tag::new(b"wght")), Some((100.0, 900.0)));
        assert_eq!(fvar.bounds(Tag::new(b"wdth")), None);
    }

    #[test]
    fn reads_real_variable_font() {
        let font = read_fonts::FontRef::new(font_test_data::VAZIRMATN_VAR).unwrap();
        let fvar = FvarTable::read(font.table_data(FvarTable::TAG).unwrap()).unwrap();
        let wght = fvar.axis(Tag::new(b"wght")).unwrap();
        assert!(wght.min <= wght.default && wght.default <= wght.max);
    }
}
