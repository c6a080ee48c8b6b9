//! STAT table synthesis and repair.
//!
//! Axis values are described with a compact notation, parsed into
//! [`ParsedAxis`] values and turned into a STAT table. Existing tables can be
//! upgraded from discrete points to ranges and normalized in place.

mod error;
pub mod model;
pub mod normalize;
pub mod notation;
pub mod serialize;
pub mod synth;
pub mod upgrade;

pub use error::{BoundsError, Error, ParseError, Result};
pub use model::{AxisValueEntry, DesignAxis, ParsedAxis, merge_axes};
pub use normalize::{
    NormalizeReport, dedupe_linked_points, normalize, normalize_regular, remove_linked_duplicates,
    retarget_regular,
};
pub use notation::{ParseOutcome, parse_axis_values, parse_axis_values_lenient};
pub use serialize::{axes_to_notation, format_fixed, stat_to_axes, stat_to_notation};
pub use synth::{StatSummary, build_stat, merge_stat, synthesize_stat};
pub use upgrade::{UpgradeReport, discrete_ranges, upgrade_discrete_to_ranges, upgrade_stat};
