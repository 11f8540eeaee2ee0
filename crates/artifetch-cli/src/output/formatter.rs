//! Output formatter trait for CLI results.

use anyhow::Result;
use artifetch_core::ArchiveManifest;
use artifetch_core::ExtractionReport;
use artifetch_core::PullReport;
use serde::Serialize;
use std::path::Path;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the outcome of `pull`
    fn format_pull_result(&self, report: &PullReport) -> Result<()>;

    /// Format the outcome of `extract`
    fn format_extraction_result(&self, output_dir: &Path, report: &ExtractionReport)
    -> Result<()>;

    /// Format archive listing (names only)
    fn format_manifest_short(&self, manifest: &ArchiveManifest) -> Result<()>;

    /// Format archive listing with kind, mode and size
    fn format_manifest_long(&self, manifest: &ArchiveManifest, human_readable: bool)
    -> Result<()>;
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    pub data: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data,
        }
    }
}

/// Extraction statistics shared by the `pull` and `extract` JSON output.
#[derive(Debug, Serialize)]
pub struct ExtractionData {
    pub files_extracted: usize,
    pub directories_created: usize,
    pub entries_skipped: usize,
    pub bytes_written: u64,
    pub duration_ms: u128,
    pub warnings: Vec<String>,
}

impl From<&ExtractionReport> for ExtractionData {
    fn from(report: &ExtractionReport) -> Self {
        Self {
            files_extracted: report.files_extracted,
            directories_created: report.directories_created,
            entries_skipped: report.entries_skipped,
            bytes_written: report.bytes_written,
            duration_ms: report.duration.as_millis(),
            warnings: report.warnings.clone(),
        }
    }
}
