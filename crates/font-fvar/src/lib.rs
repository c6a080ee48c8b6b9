//! fvar synthesis for fonts exported without (or with incomplete) variation axes.
//!
//! Axis ranges are given explicitly or auto-detected from legacy metrics
//! (OS/2 weight and width classes, italic flags, post italic angle, OS/2
//! optical sizes). One named instance is kept pointing at the default location.

mod build;
mod error;
pub mod legacy;
pub mod spec;

pub use build::{FvarOptions, FvarReport, build_fvar};
pub use error::{Error, Result};
pub use legacy::{LegacySource, detect_default, fallback_chain};
pub use spec::{AxisSetting, AxisSpec, parse_axis_spec, parse_axis_specs};
