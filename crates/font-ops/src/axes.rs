//! Registered variation axes and tag helpers.

use read_fonts::types::Tag;

/// Smallest positive 16.16 value.
const FIXED_EPSILON: f64 = 1.0 / 65536.0;
const FIXED_MIN: f64 = -32768.0;
const FIXED_MAX: f64 = 32767.0 + 65535.0 / 65536.0;

/// Facts about one of the OpenType registered axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegisteredAxis {
    pub tag: Tag,
    /// Display name used when none is given.
    pub name: &'static str,
    /// The coordinate meaning "no change" (the "Regular" position).
    pub normal: f64,
    /// Legal user-space range.
    pub min: f64,
    pub max: f64,
}

pub const REGISTERED_AXES: &[RegisteredAxis] = &[
    RegisteredAxis::new(b"wght", "Weight", 400.0, 1.0, 1000.0),
    RegisteredAxis::new(b"wdth", "Width", 100.0, FIXED_EPSILON, FIXED_MAX),
    RegisteredAxis::new(b"ital", "Italic", 0.0, 0.0, 1.0),
    RegisteredAxis::new(b"slnt", "Slant", 0.0, -90.0, 90.0),
    RegisteredAxis::new(b"opsz", "Optical size", 0.0, FIXED_EPSILON, FIXED_MAX),
];

impl RegisteredAxis {
    const fn new(tag: &[u8; 4], name: &'static str, normal: f64, min: f64, max: f64) -> Self {
        Self { tag: Tag::new(tag), name, normal, min, max }
    }
}

pub fn registered_axis(tag: Tag) -> Option<&'static RegisteredAxis> {
    REGISTERED_AXES.iter().find(|a| a.tag == tag)
}

/// The "Regular" coordinate: 400 for weight, 100 for width, 0 for everything else.
pub fn normal_value(tag: Tag) -> f64 {
    registered_axis(tag).map_or(0.0, |a| a.normal)
}

/// `(min, max)` an axis value may take.
pub fn legal_range(tag: Tag) -> (f64, f64) {
    registered_axis(tag).map_or((FIXED_MIN, FIXED_MAX), |a| (a.min, a.max))
}

/// Build a tag from up to four ASCII characters, space-padded.
///
/// Returns `None` for empty, over-long or non-printable input.
pub fn make_tag(s: &str) -> Option<Tag> {
    if s.is_empty() || s.len() > 4 || !s.bytes().all(|b| (0x20..=0x7E).contains(&b)) {
        return None;
    }
    let mut tag_bytes = [b' '; 4];
    for (i, b) in s.bytes().enumerate() {
        tag_bytes[i] = b;
    }
    Some(Tag::new(&tag_bytes))
}

/// The tag as text without trailing padding.
pub fn tag_str(tag: Tag) -> String {
    tag.to_string().trim_end().to_string()
}
