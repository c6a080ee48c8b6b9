//! Web font containers. WOFF and WOFF2 files are unwrapped to a plain sfnt for
//! editing and wrapped in the same container again on save.

use std::{
    fmt,
    io::{Read, Write},
};

use flate2::{Compression, read::ZlibDecoder, write::ZlibEncoder};
use log::debug;
use read_fonts::{FontData, FontRef, types::Tag};
use write_fonts::FontBuilder;

use crate::error::{Error, Result};

const WOFF_HEADER_LEN: usize = 44;
const WOFF_ENTRY_LEN: usize = 20;
const SFNT_HEADER_LEN: usize = 12;
const SFNT_RECORD_LEN: usize = 16;

/// The container a font file is stored in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Flavor {
    /// Plain TrueType/OpenType.
    #[default]
    Sfnt,
    /// WOFF 1.0, zlib-compressed tables.
    Woff,
    /// WOFF 2.0, brotli-compressed and transformed tables.
    Woff2,
}

impl Flavor {
    /// Sniff the container from the file signature.
    pub fn detect(data: &[u8]) -> Self {
        match data.get(..4) {
            Some(b"wOFF") => Flavor::Woff,
            Some(b"wOF2") => Flavor::Woff2,
            _ => Flavor::Sfnt,
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Flavor::Sfnt => "sfnt",
            Flavor::Woff => "WOFF",
            Flavor::Woff2 => "WOFF2",
        })
    }
}

/// Unwrap `data` to an sfnt, along with the container it came in.
pub fn decode(data: Vec<u8>) -> Result<(Flavor, Vec<u8>)> {
    let flavor = Flavor::detect(&data);
    let sfnt = match flavor {
        Flavor::Sfnt => data,
        Flavor::Woff => decode_woff(&data)?,
        Flavor::Woff2 => woff2_patched::decode::convert_woff2_to_ttf(&mut data.as_slice())
            .map_err(|err| Error::Container { flavor, message: format!("{err:?}") })?,
    };
    if flavor != Flavor::Sfnt {
        debug!("decoded {flavor} to {} byte sfnt", sfnt.len());
    }
    Ok((flavor, sfnt))
}

/// Wrap an sfnt in `flavor`.
pub fn encode(flavor: Flavor, sfnt: Vec<u8>) -> Result<Vec<u8>> {
    match flavor {
        Flavor::Sfnt => Ok(sfnt),
        Flavor::Woff => encode_woff(&sfnt),
        Flavor::Woff2 => ttf2woff2::encode(&sfnt, ttf2woff2::BrotliQuality::default())
            .map_err(|err| Error::Container { flavor, message: err.to_string() }),
    }
}

fn woff_error(message: impl Into<String>) -> Error {
    Error::Container { flavor: Flavor::Woff, message: message.into() }
}

fn decode_woff(data: &[u8]) -> Result<Vec<u8>> {
    let woff = FontData::new(data);
    let num_tables: u16 = woff.read_at(12)?;

    let mut builder = FontBuilder::new();
    for i in 0..num_tables as usize {
        let entry = WOFF_HEADER_LEN + i * WOFF_ENTRY_LEN;
        let tag: Tag = woff.read_at(entry)?;
        let offset = woff.read_at::<u32>(entry + 4)? as usize;
        let comp_length = woff.read_at::<u32>(entry + 8)? as usize;
        let orig_length = woff.read_at::<u32>(entry + 12)? as usize;

        let stored = woff
            .slice(offset..offset + comp_length)
            .ok_or_else(|| woff_error(format!("{tag} table data out of bounds")))?
            .as_bytes();
        let table = if comp_length < orig_length {
            let mut table = Vec::with_capacity(orig_length);
            ZlibDecoder::new(stored)
                .read_to_end(&mut table)
                .map_err(|err| woff_error(format!("{tag}: {err}")))?;
            table
        } else {
            stored.to_vec()
        };
        if table.len() != orig_length {
            return Err(woff_error(format!(
                "{tag} is {} bytes, header says {orig_length}",
                table.len()
            )));
        }
        builder.add_raw(tag, table);
    }
    Ok(builder.build())
}

fn encode_woff(sfnt: &[u8]) -> Result<Vec<u8>> {
    let font = FontRef::new(sfnt)?;
    let mut entries = Vec::new();
    let mut total_sfnt_size = SFNT_HEADER_LEN;
    for record in font.table_directory.table_records() {
        let tag = record.tag();
        let table = font.table_data(tag).map(|data| data.as_bytes()).unwrap_or_default();
        let compressed = zlib(table).map_err(|err| woff_error(format!("{tag}: {err}")))?;
        let stored = if compressed.len() < table.len() { compressed } else { table.to_vec() };
        total_sfnt_size += SFNT_RECORD_LEN + round4(table.len());
        entries.push((tag, record.checksum(), table.len() as u32, stored));
    }
    entries.sort_by_key(|entry| entry.0);

    let data_start = WOFF_HEADER_LEN + WOFF_ENTRY_LEN * entries.len();
    let mut directory = Vec::with_capacity(WOFF_ENTRY_LEN * entries.len());
    let mut tables = Vec::new();
    for (tag, checksum, orig_length, stored) in &entries {
        directory.extend_from_slice(&tag.to_be_bytes());
        directory.extend_from_slice(&((data_start + tables.len()) as u32).to_be_bytes());
        directory.extend_from_slice(&(stored.len() as u32).to_be_bytes());
        directory.extend_from_slice(&orig_length.to_be_bytes());
        directory.extend_from_slice(&checksum.to_be_bytes());
        tables.extend_from_slice(stored);
        tables.resize(round4(tables.len()), 0);
    }

    let sfnt_version: u32 = FontData::new(sfnt).read_at(0)?;
    let length = data_start + tables.len();
    let mut woff = Vec::with_capacity(length);
    woff.extend_from_slice(b"wOFF");
    woff.extend_from_slice(&sfnt_version.to_be_bytes());
    woff.extend_from_slice(&(length as u32).to_be_bytes());
    woff.extend_from_slice(&(entries.len() as u16).to_be_bytes());
    woff.extend_from_slice(&0u16.to_be_bytes());
    woff.extend_from_slice(&(total_sfnt_size as u32).to_be_bytes());
    // Version 1.0, then no metadata or private block
    woff.extend_from_slice(&1u16.to_be_bytes());
    woff.extend_from_slice(&0u16.to_be_bytes());
    woff.extend_from_slice(&[0u8; 20]);
    woff.extend_from_slice(&directory);
    woff.extend_from_slice(&tables);
    Ok(woff)
}

fn zlib(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

fn round4(len: usize) -> usize {
    (len + 3) & !3
}
