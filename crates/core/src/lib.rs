//! statforge core: export configurations, per-file pipelines and the batch driver.

pub mod batch;
pub mod config;
pub mod io;
pub mod pipeline;
pub mod report;

pub use batch::{process_files, run_batch, run_batch_file};
pub use config::{ExportConfiguration, ExportSettings, ExportsFile, Setting, SettingValue};
pub use io::expand_paths;
pub use pipeline::{Operation, Outcome, plan, process_file};
pub use report::{BatchResult, FileReport, FileStatus};
