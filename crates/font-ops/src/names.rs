//! Deduplicating name table registry.

use indexmap::IndexMap;
use log::debug;
use read_fonts::types::NameId;

use crate::{
    error::{Error, Result},
    handle::FontHandle,
    tables::name::NameTable,
};

/// Highest name ID reserved by the OpenType spec; new IDs are allocated above it.
const LAST_RESERVED_NAME_ID: u16 = 255;

/// Highest name ID usable for font-specific names.
const LAST_USABLE_NAME_ID: u16 = 32767;

/// Hands out one name ID per distinct string for a single font.
///
/// The registry owns a working copy of the font's name table. Resolve
/// strings through it while mutating other tables, then [`commit`](Self::commit)
/// it back into the handle before saving.
#[derive(Debug, Clone)]
pub struct NameRegistry {
    table: NameTable,
    lookup: IndexMap<String, NameId>,
    allocated: Vec<NameId>,
}

impl NameRegistry {
    /// Load the registry from the handle's current name table (empty if absent).
    pub fn load(handle: &FontHandle) -> Result<Self> {
        Ok(Self::from_table(handle.table_or_default()?))
    }

    pub fn from_table(table: NameTable) -> Self {
        let mut lookup: IndexMap<String, NameId> = IndexMap::new();
        for record in table.records.iter().filter(|r| r.is_canonical()) {
            lookup
                .entry(record.value.clone())
                .and_modify(|id| *id = (*id).min(record.name_id))
                .or_insert(record.name_id);
        }
        Self { table, lookup, allocated: Vec::new() }
    }

    /// The name ID for `value`, adding a record if no Windows English record has it.
    pub fn resolve(&mut self, value: &str) -> Result<NameId> {
        if let Some(&id) = self.lookup.get(value) {
            return Ok(id);
        }

        let highest = self
            .table
            .max_name_id()
            .map_or(LAST_RESERVED_NAME_ID, |id| id.to_u16().max(LAST_RESERVED_NAME_ID));
        if highest >= LAST_USABLE_NAME_ID {
            return Err(Error::NameIdsExhausted(value.to_string()));
        }

        let id = NameId::new(highest + 1);
        debug!("name ID {id} -> '{value}'");
        self.table.insert(id, value);
        self.lookup.insert(value.to_string(), id);
        self.allocated.push(id);
        Ok(id)
    }

    /// The string behind `name_id`.
    pub fn get_string(&self, name_id: NameId) -> Result<&str> {
        self.table.get(name_id).ok_or(Error::NameNotFound(name_id))
    }

    pub fn contains(&self, name_id: NameId) -> bool {
        self.table.contains(name_id)
    }

    /// Name IDs created by this registry, in allocation order.
    pub fn allocated(&self) -> &[NameId] {
        &self.allocated
    }

    pub fn table(&self) -> &NameTable {
        &self.table
    }

    /// Stage the name table on the handle if any ID was allocated.
    pub fn commit(&self, handle: &mut FontHandle) -> Result<bool> {
        if self.allocated.is_empty() {
            return Ok(false);
        }
        handle.stage(&self.table)
    }
}
