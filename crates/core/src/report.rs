//! Per-file report lines and batch totals.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use anyhow::{Result, bail};

use crate::pipeline::Outcome;

#[derive(Debug)]
pub enum FileStatus {
    Changed(String),
    Unchanged,
    Failed(anyhow::Error),
    /// The expected export was not found on disk.
    Skipped,
}

#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub status: FileStatus,
    /// Printed under the status line, one per line.
    pub warnings: Vec<String>,
}

impl FileReport {
    pub fn new(path: &Path, result: Result<Outcome>) -> Self {
        let (status, warnings) = match result {
            Ok(outcome) if outcome.changed => {
                (FileStatus::Changed(outcome.summaries.join("; ")), outcome.warnings)
            }
            Ok(outcome) => (FileStatus::Unchanged, outcome.warnings),
            Err(err) => (FileStatus::Failed(err), Vec::new()),
        };
        Self { path: path.to_path_buf(), status, warnings }
    }

    pub fn skipped(path: &Path) -> Self {
        Self { path: path.to_path_buf(), status: FileStatus::Skipped, warnings: Vec::new() }
    }
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path.display();
        match &self.status {
            FileStatus::Changed(summary) => write!(f, "✅ {path}: {summary}")?,
            FileStatus::Unchanged => write!(f, "🤷 {path}: no changes made")?,
            FileStatus::Failed(err) => write!(f, "❌ {path}: {err:#}")?,
            FileStatus::Skipped => write!(f, "⏭️  {path}: not found, skipped")?,
        }
        for warning in &self.warnings {
            write!(f, "\n   ⚠️  {warning}")?;
        }
        Ok(())
    }
}

/// Totals over a batch of files.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchResult {
    pub changed: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl BatchResult {
    /// Count `report` and print its line.
    pub fn record(&mut self, report: &FileReport) {
        match report.status {
            FileStatus::Changed(_) => self.changed += 1,
            FileStatus::Unchanged => self.unchanged += 1,
            FileStatus::Failed(_) => self.failed += 1,
            FileStatus::Skipped => self.skipped += 1,
        }
        println!("{report}");
    }

    pub fn total(&self) -> usize {
        self.changed + self.unchanged + self.failed
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    pub fn ok_or_bail(&self, operation: &str) -> Result<()> {
        if self.failed > 0 {
            bail!("{operation} failed for {} of {} files", self.failed, self.total());
        }
        Ok(())
    }
}

impl fmt::Display for BatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { changed, unchanged, failed, skipped } = self;
        write!(f, "{changed} changed, {unchanged} unchanged, {failed} failed")?;
        if *skipped > 0 {
            write!(f, " ({skipped} skipped)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn saved(summaries: &[&str], warnings: &[&str]) -> Outcome {
        Outcome {
            changed: true,
            summaries: summaries.iter().map(|s| s.to_string()).collect(),
            warnings: warnings.iter().map(|w| w.to_string()).collect(),
        }
    }

    #[test]
    fn lines_use_status_markers() {
        let path = Path::new("A.ttf");
        let changed = FileReport::new(path, Ok(saved(&["one", "two"], &[])));
        assert_eq!(changed.to_string(), "✅ A.ttf: one; two");
        let unchanged = FileReport::new(path, Ok(Outcome::default()));
        assert_eq!(unchanged.to_string(), "🤷 A.ttf: no changes made");
        let failed = FileReport::new(path, Err(anyhow!("boom")));
        assert_eq!(failed.to_string(), "❌ A.ttf: boom");
    }

    #[test]
    fn warnings_follow_the_status_line() {
        let path = Path::new("A.ttf");
        let outcome = saved(&["ranges: upgraded ital"], &["few points"]);
        let report = FileReport::new(path, Ok(outcome));
        assert_eq!(report.to_string(), "✅ A.ttf: ranges: upgraded ital\n   ⚠️  few points");

        let unchanged = Outcome { warnings: vec!["few points".into()], ..Outcome::default() };
        let report = FileReport::new(path, Ok(unchanged));
        assert_eq!(report.to_string(), "🤷 A.ttf: no changes made\n   ⚠️  few points");
    }

    #[test]
    fn totals_and_bail() {
        let mut result = BatchResult::default();
        result.record(&FileReport::new(Path::new("A.ttf"), Ok(Outcome::default())));
        result.record(&FileReport::skipped(Path::new("B.ttf")));
        assert!(result.ok_or_bail("stat").is_ok());
        assert_eq!(result.to_string(), "0 changed, 1 unchanged, 0 failed (1 skipped)");

        result.record(&FileReport::new(Path::new("C.ttf"), Err(anyhow!("bad"))));
        assert!(!result.all_succeeded());
        assert!(result.ok_or_bail("stat").is_err());
    }
}
