//! File argument expansion.

use std::path::PathBuf;

use anyhow::{Context, Result};
use glob::glob;
use log::warn;

/// Expand glob patterns in file arguments, keeping argument order.
///
/// An argument that matches nothing is kept as a literal path so the file
/// shows up as a failure instead of disappearing.
pub fn expand_paths<I, S>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut paths = Vec::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let matches: Vec<PathBuf> = glob(pattern)
            .with_context(|| format!("Failed to glob pattern: {pattern}"))?
            .filter_map(Result::ok)
            .collect();
        if matches.is_empty() {
            warn!("no files match '{pattern}'");
            paths.push(PathBuf::from(pattern));
        } else {
            paths.extend(matches);
        }
    }
    Ok(paths)
}
