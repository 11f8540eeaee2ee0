//! JSON output formatter for machine-readable results.

use super::formatter::ExtractionData;
use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use artifetch_core::ArchiveManifest;
use artifetch_core::ExtractionReport;
use artifetch_core::PullReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }

    fn manifest_output(manifest: &ArchiveManifest) -> ManifestData {
        ManifestData {
            format: manifest.format.to_string(),
            total_entries: manifest.total_entries,
            total_size: manifest.total_size,
            entries: manifest
                .entries
                .iter()
                .map(|entry| EntryData {
                    name: entry.name.clone(),
                    kind: entry.kind.to_string(),
                    mode: entry.mode,
                    size: entry.size,
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct EntryData {
    name: String,
    kind: String,
    mode: u32,
    size: u64,
}

#[derive(Serialize)]
struct ManifestData {
    format: String,
    total_entries: usize,
    total_size: u64,
    entries: Vec<EntryData>,
}

impl OutputFormatter for JsonFormatter {
    fn format_pull_result(&self, report: &PullReport) -> Result<()> {
        #[derive(Serialize)]
        struct PullOutput {
            destination: String,
            format: String,
            remote_key: String,
            attempts: usize,
            extraction: ExtractionData,
        }

        let data = PullOutput {
            destination: report.destination.display().to_string(),
            format: report.format.to_string(),
            remote_key: report.remote_key.clone(),
            attempts: report.attempts,
            extraction: ExtractionData::from(&report.extraction),
        };

        Self::output(&JsonOutput::success("pull", data))
    }

    fn format_extraction_result(
        &self,
        output_dir: &Path,
        report: &ExtractionReport,
    ) -> Result<()> {
        #[derive(Serialize)]
        struct ExtractOutput {
            output_dir: String,
            #[serde(flatten)]
            stats: ExtractionData,
        }

        let data = ExtractOutput {
            output_dir: output_dir.display().to_string(),
            stats: ExtractionData::from(report),
        };

        Self::output(&JsonOutput::success("extract", data))
    }

    fn format_manifest_short(&self, manifest: &ArchiveManifest) -> Result<()> {
        Self::output(&JsonOutput::success("list", Self::manifest_output(manifest)))
    }

    fn format_manifest_long(&self, manifest: &ArchiveManifest, _human_readable: bool) -> Result<()> {
        Self::output(&JsonOutput::success("list", Self::manifest_output(manifest)))
    }
}
