//! Extraction and pull reporting.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use crate::formats::ArchiveFormat;

/// What a single extraction run wrote and skipped.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Number of regular files written.
    pub files_extracted: usize,

    /// Number of directory entries materialized.
    pub directories_created: usize,

    /// Total bytes written to disk.
    pub bytes_written: u64,

    /// Number of entries skipped because their type is not extracted.
    pub entries_skipped: usize,

    /// Duration of the extraction operation.
    pub duration: Duration,

    /// Diagnostics generated during extraction.
    pub warnings: Vec<String>,
}

impl ExtractionReport {
    /// Creates a new empty extraction report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, message: String) {
        self.warnings.push(message);
    }

    /// Returns the number of entries written to disk.
    #[must_use]
    pub fn entries_written(&self) -> usize {
        self.files_extracted + self.directories_created
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Outcome of a full fetch, extract and cleanup run.
#[derive(Debug, Clone)]
pub struct PullReport {
    /// Directory the archive was extracted into.
    pub destination: PathBuf,

    /// Container format that was found.
    pub format: ArchiveFormat,

    /// Remote key that was fetched successfully.
    pub remote_key: String,

    /// Number of fetch attempts, including the successful one.
    pub attempts: usize,

    /// Statistics of the extraction step.
    pub extraction: ExtractionReport,
}

/// Callback trait for progress reporting during extraction.
///
/// The total entry count of a tar stream is unknown until the end, so only
/// the running index is reported.
///
/// # Examples
///
/// ```
/// use artifetch_core::ProgressCallback;
/// use std::path::Path;
///
/// #[derive(Default)]
/// struct ByteCounter(u64);
///
/// impl ProgressCallback for ByteCounter {
///     fn on_entry_start(&mut self, _path: &Path, _current: usize) {}
///     fn on_bytes_written(&mut self, bytes: u64) {
///         self.0 += bytes;
///     }
///     fn on_entry_complete(&mut self, _path: &Path) {}
///     fn on_complete(&mut self) {
///         eprintln!("{} bytes written", self.0);
///     }
/// }
/// ```
pub trait ProgressCallback {
    /// Called when starting to process an entry (`current` is 1-indexed).
    fn on_entry_start(&mut self, path: &Path, current: usize);

    /// Called after an entry's content has been written.
    fn on_bytes_written(&mut self, bytes: u64);

    /// Called when an entry has been completely processed.
    fn on_entry_complete(&mut self, path: &Path);

    /// Called when the whole archive has been processed.
    fn on_complete(&mut self);
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry_start(&mut self, _path: &Path, _current: usize) {}

    fn on_bytes_written(&mut self, _bytes: u64) {}

    fn on_entry_complete(&mut self, _path: &Path) {}

    fn on_complete(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts_written_entries_only() {
        let mut report = ExtractionReport {
            files_extracted: 3,
            directories_created: 2,
            entries_skipped: 1,
            ..ExtractionReport::new()
        };
        assert_eq!(report.entries_written(), 5);
        assert!(!report.has_warnings());

        report.add_warning("skipped symlink entry: a/link".to_string());
        assert_eq!(report.warnings, ["skipped symlink entry: a/link"]);
    }
}
