//! Sequential batch driver: files × export configurations × formats.

use std::path::{Path, PathBuf};

use log::info;

use crate::{
    config::ExportsFile,
    pipeline::{Operation, plan, process_file},
    report::{BatchResult, FileReport},
};

/// Run the same operations over every path, in order.
pub fn process_files(paths: &[PathBuf], operations: &[Operation]) -> BatchResult {
    let mut result = BatchResult::default();
    for path in paths {
        result.record(&FileReport::new(path, process_file(path, operations)));
    }
    result
}

/// Apply every export configuration to the binaries exported from `fonts`.
///
/// For each font, configuration and format the unit of work is the file the
/// configuration's template names next to the font. Missing exports are
/// skipped; failures are recorded and the batch carries on.
pub fn run_batch(config: &ExportsFile, fonts: &[PathBuf]) -> BatchResult {
    let mut result = BatchResult::default();

    for font in fonts {
        for export in &config.exports {
            info!("{}: export '{}'", font.display(), export.name);
            let operations = export.settings().and_then(|settings| plan(&settings));

            for format in &export.formats {
                let candidate = export.candidate(font, format);
                let report = match &operations {
                    _ if !candidate.is_file() => FileReport::skipped(&candidate),
                    Ok(operations) => {
                        FileReport::new(&candidate, process_file(&candidate, operations))
                    }
                    Err(err) => FileReport::new(&candidate, Err(anyhow::anyhow!("{err:#}"))),
                };
                result.record(&report);
            }
        }
    }

    result
}

/// Convenience for callers holding a config path.
pub fn run_batch_file(config: &Path, fonts: &[PathBuf]) -> anyhow::Result<BatchResult> {
    Ok(run_batch(&ExportsFile::load(config)?, fonts))
}
