//! The `name` table model.

use log::warn;
use read_fonts::{
    FontData, FontRead, ReadError,
    types::{NameId, Tag},
};
use write_fonts::tables::name::{Name, NameRecord};

use super::TableModel;
use crate::error::Result;

/// Windows platform, Unicode BMP encoding, English (US): the target of every write.
pub const WINDOWS_PLATFORM_ID: u16 = 3;
pub const WINDOWS_UNICODE_BMP: u16 = 1;
pub const WINDOWS_ENGLISH_US: u16 = 0x409;

/// One decoded name record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameEntry {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub language_id: u16,
    pub name_id: NameId,
    pub value: String,
}

impl NameEntry {
    pub fn is_canonical(&self) -> bool {
        (self.platform_id, self.encoding_id, self.language_id)
            == (WINDOWS_PLATFORM_ID, WINDOWS_UNICODE_BMP, WINDOWS_ENGLISH_US)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameTable {
    pub records: Vec<NameEntry>,
}

impl NameTable {
    /// The string for `name_id`, preferring the Windows English record.
    pub fn get(&self, name_id: NameId) -> Option<&str> {
        self.records
            .iter()
            .filter(|r| r.name_id == name_id)
            .min_by_key(|r| !r.is_canonical())
            .map(|r| r.value.as_str())
    }

    /// The lowest name ID whose Windows English record is exactly `value`.
    pub fn find(&self, value: &str) -> Option<NameId> {
        self.records
            .iter()
            .filter(|r| r.is_canonical() && r.value == value)
            .map(|r| r.name_id)
            .min()
    }

    pub fn contains(&self, name_id: NameId) -> bool {
        self.records.iter().any(|r| r.name_id == name_id)
    }

    /// The highest name ID on any platform.
    pub fn max_name_id(&self) -> Option<NameId> {
        self.records.iter().map(|r| r.name_id).max()
    }

    /// Insert or replace the Windows English record for `name_id`.
    pub fn insert(&mut self, name_id: NameId, value: impl Into<String>) {
        let value = value.into();
        match self.records.iter_mut().find(|r| r.is_canonical() && r.name_id == name_id) {
            Some(record) => record.value = value,
            None => self.records.push(NameEntry {
                platform_id: WINDOWS_PLATFORM_ID,
                encoding_id: WINDOWS_UNICODE_BMP,
                language_id: WINDOWS_ENGLISH_US,
                name_id,
                value,
            }),
        }
    }
}

impl TableModel for NameTable {
    const TAG: Tag = Tag::new(b"name");

    fn read(data: FontData<'_>) -> std::result::Result<Self, ReadError> {
        let name = read_fonts::tables::name::Name::read(data)?;
        let mut records = Vec::new();

        for record in name.name_record() {
            let value = match record.string(name.string_data()) {
                Ok(s) => s.chars().collect::<String>(),
                Err(e) => {
                    warn!("skipping undecodable name record {}: {e}", record.name_id());
                    continue;
                }
            };
            records.push(NameEntry {
                platform_id: record.platform_id(),
                encoding_id: record.encoding_id(),
                language_id: record.language_id(),
                name_id: record.name_id(),
                value,
            });
        }

        Ok(Self { records })
    }

    fn write(&self) -> Result<Vec<u8>> {
        let mut records: Vec<NameRecord> = self
            .records
            .iter()
            .map(|r| {
                NameRecord::new(
                    r.platform_id,
                    r.encoding_id,
                    r.language_id,
                    r.name_id,
                    r.value.clone().into(),
                )
            })
            .collect();

        // Sort records by (platformID, encodingID, languageID, nameID)
        records.sort_by(|a, b| {
            (a.platform_id, a.encoding_id, a.language_id, a.name_id).cmp(&(
                b.platform_id,
                b.encoding_id,
                b.language_id,
                b.name_id,
            ))
        });

        Ok(write_fonts::dump_table(&Name::new(records))?)
    }
}
