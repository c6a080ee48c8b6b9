//! Axis defaults derived from pre-variable-font metadata.

use std::path::Path;

use read_fonts::{FontRef, TableProvider, tables::os2::SelectionFlags, types::Tag};
use statforge_font_ops::axes::tag_str;

use crate::error::{Error, Result};

/// `usWidthClass` 1-9 as `wdth` percentages.
const WIDTH_CLASS_PERCENT: [f64; 9] = [50.0, 62.5, 75.0, 87.5, 100.0, 112.5, 125.0, 150.0, 200.0];

/// "No upper bound" for OS/2 optical point sizes.
const NO_UPPER_OPTICAL_SIZE: u16 = 0xFFFF;

/// One place a default coordinate can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacySource {
    /// OS/2 `usWeightClass`.
    WeightClass,
    /// OS/2 `usWidthClass`, mapped to a percentage.
    WidthClass,
    /// OS/2 `fsSelection` italic bit. Answers 0 or 1 whenever OS/2 exists.
    ItalicBit,
    /// 1 when post `italicAngle` is non-zero.
    SlantedAngle,
    /// 1 when the file name says Italic or Oblique.
    ItalicFileName,
    /// post `italicAngle`.
    ItalicAngle,
    /// Midpoint of the OS/2 (v5) optical point size range.
    OpticalSize,
    /// Always 0.
    Zero,
}

impl LegacySource {
    /// Read this source, `None` when the font does not carry it.
    pub fn read(self, font: &FontRef, path: &Path) -> Option<f64> {
        match self {
            LegacySource::WeightClass => font.os2().ok().map(|os2| os2.us_weight_class() as f64),
            LegacySource::WidthClass => {
                let class = font.os2().ok()?.us_width_class();
                WIDTH_CLASS_PERCENT.get((class as usize).checked_sub(1)?).copied()
            }
            LegacySource::ItalicBit => {
                let os2 = font.os2().ok()?;
                Some(if os2.fs_selection().contains(SelectionFlags::ITALIC) { 1.0 } else { 0.0 })
            }
            LegacySource::SlantedAngle => {
                let angle = font.post().ok()?.italic_angle().to_f64();
                (angle != 0.0).then_some(1.0)
            }
            LegacySource::ItalicFileName => {
                let stem = path.file_stem()?.to_string_lossy();
                (stem.contains("Italic") || stem.contains("Oblique")).then_some(1.0)
            }
            LegacySource::ItalicAngle => font.post().ok().map(|post| post.italic_angle().to_f64()),
            LegacySource::OpticalSize => {
                let os2 = font.os2().ok()?;
                let lower = os2.us_lower_optical_point_size()?;
                let upper = os2.us_upper_optical_point_size()?;
                // Sizes are stored in twentieths of a point
                let points = if upper == NO_UPPER_OPTICAL_SIZE {
                    lower as f64 / 20.0
                } else {
                    (lower as f64 + upper as f64) / 40.0
                };
                Some(points)
            }
            LegacySource::Zero => Some(0.0),
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            LegacySource::WeightClass => "OS/2 usWeightClass",
            LegacySource::WidthClass => "OS/2 usWidthClass",
            LegacySource::ItalicBit => "OS/2 fsSelection italic bit",
            LegacySource::SlantedAngle => "post italicAngle",
            LegacySource::ItalicFileName => "file name",
            LegacySource::ItalicAngle => "post italicAngle",
            LegacySource::OpticalSize => "OS/2 optical point size range",
            LegacySource::Zero => "zero",
        }
    }
}

/// Sources tried, in order, for each registered axis.
pub fn fallback_chain(tag: Tag) -> &'static [LegacySource] {
    use LegacySource::*;

    match &tag.to_be_bytes() {
        b"wght" => &[WeightClass],
        b"wdth" => &[WidthClass],
        b"ital" => &[ItalicBit, SlantedAngle, ItalicFileName, Zero],
        b"slnt" => &[ItalicAngle],
        b"opsz" => &[OpticalSize],
        _ => &[],
    }
}

/// The first value any source in the axis's chain yields.
pub fn detect_default(font: &FontRef, path: &Path, tag: Tag) -> Result<f64> {
    let chain = fallback_chain(tag);
    if let Some(value) = chain.iter().find_map(|source| source.read(font, path)) {
        return Ok(value);
    }

    let tried = if chain.is_empty() {
        "no legacy source for this axis".to_string()
    } else {
        let sources: Vec<_> = chain.iter().map(|s| s.describe()).collect();
        format!("tried {}", sources.join(", "))
    };
    Err(Error::NotFound { tag: tag_str(tag), tried })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ital_chain_ends_in_zero() {
        assert_eq!(fallback_chain(Tag::new(b"ital")).last(), Some(&LegacySource::Zero));
        assert!(fallback_chain(Tag::new(b"GRAD")).is_empty());
    }

    #[test]
    fn custom_axis_has_no_default() {
        let font = FontRef::new(font_test_data::SIMPLE_GLYF).unwrap();
        let err = detect_default(&font, Path::new("Font.ttf"), Tag::new(b"GRAD")).unwrap_err();
        assert!(matches!(err, Error::NotFound { ref tag, .. } if tag == "GRAD"));
    }

    #[test]
    fn file_name_marks_italic() {
        let font = FontRef::new(font_test_data::SIMPLE_GLYF).unwrap();
        let source = LegacySource::ItalicFileName;
        assert_eq!(source.read(&font, Path::new("dir/Sans-BoldItalic.ttf")), Some(1.0));
        assert_eq!(source.read(&font, Path::new("dir/Sans-Oblique.otf")), Some(1.0));
        assert_eq!(source.read(&font, Path::new("dir/Sans-Bold.ttf")), None);
    }
}
