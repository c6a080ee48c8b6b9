//! The font handle: one file's open → mutate → save cycle.

use std::{
    collections::BTreeMap,
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};
use read_fonts::{FontData, FontRef, types::Tag};

use crate::{
    container::{self, Flavor},
    error::{Error, Result},
    rewrite_font,
    tables::TableModel,
};

/// An open font binary with staged table replacements.
///
/// Reads always see the staged version of a table if there is one, so
/// several passes can be chained on the same handle before saving. WOFF and
/// WOFF2 files are edited as the sfnt they wrap and saved in their own
/// container.
#[derive(Debug, Clone)]
pub struct FontHandle {
    path: PathBuf,
    flavor: Flavor,
    /// The unwrapped sfnt.
    data: Vec<u8>,
    staged: BTreeMap<Tag, Vec<u8>>,
}

impl FontHandle {
    /// Open a font file, failing if it is unreadable or not a font.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data =
            fs::read(&path).map_err(|source| Error::ReadFile { path: path.clone(), source })?;
        Self::from_data(path, data)
    }

    /// Wrap font data that was read elsewhere; `path` is where [`save`](Self::save) writes.
    pub fn from_data(path: impl Into<PathBuf>, data: Vec<u8>) -> Result<Self> {
        let path = path.into();
        let (flavor, data) = container::decode(data)?;
        if let Err(source) = FontRef::new(&data) {
            return Err(Error::InvalidFont { path, source });
        }
        Ok(Self { path, flavor, data, staged: BTreeMap::new() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The container the font was read from and will be saved in.
    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    /// The font as it was opened, without staged changes.
    pub fn font(&self) -> Result<FontRef<'_>> {
        FontRef::new(&self.data)
            .map_err(|source| Error::InvalidFont { path: self.path.clone(), source })
    }

    /// Read a table from the original font, ignoring staged changes.
    pub fn original_table<T: TableModel>(&self) -> Result<Option<T>> {
        let font = self.font()?;
        font.table_data(T::TAG).map(read_table::<T>).transpose()
    }

    /// Read a table, preferring the staged version.
    pub fn table<T: TableModel>(&self) -> Result<Option<T>> {
        match self.staged.get(&T::TAG) {
            Some(bytes) => read_table::<T>(FontData::new(bytes)).map(Some),
            None => self.original_table(),
        }
    }

    /// Read a table, or an empty one if the font does not have it.
    pub fn table_or_default<T: TableModel>(&self) -> Result<T> {
        Ok(self.table()?.unwrap_or_default())
    }

    /// Stage a table for the next save.
    ///
    /// Returns `false` (and drops any earlier staged version) when the table
    /// is identical to what the font already contains.
    pub fn stage<T: TableModel>(&mut self, table: &T) -> Result<bool> {
        let unchanged = match self.original_table::<T>()? {
            Some(original) => original == *table,
            None => *table == T::default(),
        };
        if unchanged {
            if self.staged.remove(&T::TAG).is_some() {
                debug!("{}: {} back to original", self.path.display(), T::TAG);
            }
            return Ok(false);
        }

        let bytes = table.write()?;
        info!("{}: staged {} table ({} bytes)", self.path.display(), T::TAG, bytes.len());
        self.staged.insert(T::TAG, bytes);
        Ok(true)
    }

    pub fn is_modified(&self) -> bool {
        !self.staged.is_empty()
    }

    /// Tags of the tables that differ from the original font.
    pub fn modified_tables(&self) -> Vec<Tag> {
        self.staged.keys().copied().collect()
    }

    /// Serialize the font with staged tables applied, in its original container.
    ///
    /// Tables that were not staged are copied byte-for-byte into the sfnt.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let sfnt = rewrite_font(&self.data, |_font, builder| {
            for (tag, bytes) in &self.staged {
                builder.add_raw(*tag, bytes.clone());
            }
            Ok(())
        })?;
        container::encode(self.flavor, sfnt)
    }

    /// Write staged changes back to the file the handle was opened from.
    ///
    /// Returns `false` without touching the file when nothing changed.
    pub fn save(&self) -> Result<bool> {
        if !self.is_modified() {
            return Ok(false);
        }
        self.save_as(&self.path)?;
        Ok(true)
    }

    /// Write the font, staged changes applied, to `path`.
    pub fn save_as(&self, path: &Path) -> Result<()> {
        let data = self.to_bytes()?;
        write_atomic(path, &data)
    }
}

fn read_table<T: TableModel>(data: FontData<'_>) -> Result<T> {
    T::read(data).map_err(|source| Error::ReadTable { table: T::TAG.to_string(), source })
}

/// Write through a sibling temporary file so a failed write never truncates `path`.
fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let mut file_name = path.file_name().map(OsString::from).unwrap_or_default();
    file_name.push(".tmp");
    let tmp = path.with_file_name(file_name);

    fs::write(&tmp, data).map_err(|source| Error::WriteFile { path: tmp.clone(), source })?;
    fs::rename(&tmp, path).map_err(|source| {
        let _ = fs::remove_file(&tmp);
        Error::WriteFile { path: path.to_path_buf(), source }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{name::NameTable, stat::StatTable};
    use read_fonts::{TableProvider, types::NameId};

    #[test]
    fn rejects_non_font_data() {
        let result = FontHandle::from_data("garbage.ttf", b"definitely not a font".to_vec());
        assert!(matches!(result, Err(Error::InvalidFont { .. })));
    }

    #[test]
    fn open_missing_file_is_read_error() {
        let result = FontHandle::open("/nonexistent/dir/Missing.ttf");
        assert!(matches!(result, Err(Error::ReadFile { .. })));
    }

    #[test]
    fn missing_table_reads_as_default() {
        let handle =
            FontHandle::from_data("simple.ttf", font_test_data::SIMPLE_GLYF.to_vec()).unwrap();
        let stat: StatTable = handle.table_or_default().unwrap();
        assert!(stat.design_axes.is_empty());
        assert!(stat.axis_values.is_empty());
    }

    #[test]
    fn staging_default_for_absent_table_is_noop() {
        let mut handle =
            FontHandle::from_data("simple.ttf", font_test_data::SIMPLE_GLYF.to_vec()).unwrap();
        assert!(!handle.stage(&StatTable::default()).unwrap());
        assert!(!handle.is_modified());
    }

    #[test]
    fn staging_unchanged_table_is_noop() {
        let mut handle =
            FontHandle::from_data("var.ttf", font_test_data::VAZIRMATN_VAR.to_vec()).unwrap();
        let name: NameTable = handle.table_or_default().unwrap();
        assert!(!handle.stage(&name).unwrap());
        assert!(handle.to_bytes().is_ok());
        assert!(!handle.is_modified());
    }

    #[test]
    fn untouched_tables_survive_rewrite() {
        let mut handle =
            FontHandle::from_data("var.ttf", font_test_data::VAZIRMATN_VAR.to_vec()).unwrap();
        let mut name: NameTable = handle.table_or_default().unwrap();
        name.insert(NameId::new(400), "Staged");
        assert!(handle.stage(&name).unwrap());
        assert_eq!(handle.modified_tables(), vec![Tag::new(b"name")]);

        let rewritten = handle.to_bytes().unwrap();
        let before = FontRef::new(font_test_data::VAZIRMATN_VAR).unwrap();
        let after = FontRef::new(&rewritten).unwrap();
        for tag in [Tag::new(b"glyf"), Tag::new(b"gvar"), Tag::new(b"fvar")] {
            assert_eq!(
                before.table_data(tag).map(|d| d.as_bytes().to_vec()),
                after.table_data(tag).map(|d| d.as_bytes().to_vec()),
                "{tag} changed"
            );
        }
        assert_eq!(after.maxp().unwrap().num_glyphs(), before.maxp().unwrap().num_glyphs());
    }

    #[test]
    fn staged_table_is_visible_before_save() {
        let mut handle =
            FontHandle::from_data("var.ttf", font_test_data::VAZIRMATN_VAR.to_vec()).unwrap();
        let mut name: NameTable = handle.table_or_default().unwrap();
        name.insert(NameId::new(400), "Staged");
        handle.stage(&name).unwrap();

        let reread: NameTable = handle.table_or_default().unwrap();
        assert_eq!(reread.get(NameId::new(400)), Some("Staged"));
        let original: NameTable = handle.original_table().unwrap().unwrap();
        assert_eq!(original.get(NameId::new(400)), None);
    }

    fn stage_marker_name(handle: &mut FontHandle) {
        let mut name: NameTable = handle.table_or_default().unwrap();
        name.insert(NameId::new(400), "Staged");
        assert!(handle.stage(&name).unwrap());
    }

    #[test]
    fn woff_is_edited_and_saved_as_woff() {
        let woff = container::encode(Flavor::Woff, font_test_data::VAZIRMATN_VAR.to_vec()).unwrap();
        let mut handle = FontHandle::from_data("var.woff", woff).unwrap();
        assert_eq!(handle.flavor(), Flavor::Woff);
        stage_marker_name(&mut handle);

        let saved = handle.to_bytes().unwrap();
        assert_eq!(&saved[..4], b"wOFF");
        let reopened = FontHandle::from_data("var.woff", saved).unwrap();
        let name: NameTable = reopened.table_or_default().unwrap();
        assert_eq!(name.get(NameId::new(400)), Some("Staged"));
    }

    #[test]
    fn woff2_is_saved_as_woff2() {
        let woff2 =
            container::encode(Flavor::Woff2, font_test_data::VAZIRMATN_VAR.to_vec()).unwrap();
        let mut handle = FontHandle::from_data("var.woff2", woff2).unwrap();
        assert_eq!(handle.flavor(), Flavor::Woff2);
        stage_marker_name(&mut handle);

        let saved = handle.to_bytes().unwrap();
        assert_eq!(Flavor::detect(&saved), Flavor::Woff2);
        let reopened = FontHandle::from_data("var.woff2", saved).unwrap();
        let name: NameTable = reopened.table_or_default().unwrap();
        assert_eq!(name.get(NameId::new(400)), Some("Staged"));
    }

    #[test]
    fn save_skips_unmodified_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Font.ttf");
        fs::write(&path, font_test_data::SIMPLE_GLYF).unwrap();

        let handle = FontHandle::open(&path).unwrap();
        assert!(!handle.save().unwrap());
        assert_eq!(fs::read(&path).unwrap(), font_test_data::SIMPLE_GLYF);
    }

    #[test]
    fn save_writes_staged_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Font.ttf");
        fs::write(&path, font_test_data::VAZIRMATN_VAR).unwrap();

        let mut handle = FontHandle::open(&path).unwrap();
        let mut name: NameTable = handle.table_or_default().unwrap();
        name.insert(NameId::new(400), "Saved");
        handle.stage(&name).unwrap();
        assert!(handle.save().unwrap());

        let reopened = FontHandle::open(&path).unwrap();
        let name: NameTable = reopened.table_or_default().unwrap();
        assert_eq!(name.get(NameId::new(400)), Some("Saved"));
        assert!(!dir.path().join("Font.ttf.tmp").exists());
    }
}
