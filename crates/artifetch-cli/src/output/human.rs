//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use crate::progress::humanize_bytes;
use anyhow::Result;
use artifetch_core::ArchiveManifest;
use artifetch_core::EntryKind;
use artifetch_core::ExtractionReport;
use artifetch_core::PullReport;
use console::Term;
use console::style;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();

        for (count, c) in s.chars().rev().enumerate() {
            if count > 0 && count % 3 == 0 {
                result.push(',');
            }
            result.push(c);
        }

        result.chars().rev().collect()
    }

    fn kind_char(kind: &EntryKind) -> char {
        match kind {
            EntryKind::Directory => 'd',
            EntryKind::RegularFile => '-',
            EntryKind::Other { .. } => '?',
        }
    }

    fn write_summary(&self, report: &ExtractionReport) {
        let _ = self.term.write_line(&format!(
            "  Files extracted: {}",
            Self::format_number(report.files_extracted)
        ));
        let _ = self.term.write_line(&format!(
            "  Directories: {}",
            Self::format_number(report.directories_created)
        ));
        let _ = self.term.write_line(&format!(
            "  Total size: {}",
            humanize_bytes(report.bytes_written)
        ));

        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Skipped: {}", report.entries_skipped));
            let _ = self
                .term
                .write_line(&format!("  Duration: {:?}", report.duration));
        }

        self.write_warnings(&report.warnings);
    }

    fn write_warnings(&self, warnings: &[String]) {
        for warning in warnings {
            if self.use_colors {
                let _ = self
                    .term
                    .write_line(&format!("{} {warning}", style("⚠").yellow().bold()));
            } else {
                let _ = self.term.write_line(&format!("WARNING: {warning}"));
            }
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_pull_result(&self, report: &PullReport) -> Result<()> {
        // Quiet mode still prints the path so scripts can capture it.
        if self.quiet {
            self.term
                .write_line(&report.destination.display().to_string())?;
            return Ok(());
        }

        let _ = self.term.write_line(&format!(
            "Fetched {} ({}, {} attempt{})",
            report.remote_key,
            report.format,
            report.attempts,
            if report.attempts == 1 { "" } else { "s" }
        ));
        self.write_summary(&report.extraction);

        let done = format!(
            "Done. Uncompressed file is here --> {}",
            report.destination.display()
        );
        if self.use_colors {
            self.term
                .write_line(&format!("{} {done}", style("✓").green().bold()))?;
        } else {
            self.term.write_line(&done)?;
        }

        Ok(())
    }

    fn format_extraction_result(
        &self,
        output_dir: &Path,
        report: &ExtractionReport,
    ) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.use_colors {
            let _ = self.term.write_line(&format!(
                "{} Extraction complete: {}",
                style("✓").green().bold(),
                output_dir.display()
            ));
        } else {
            let _ = self
                .term
                .write_line(&format!("Extraction complete: {}", output_dir.display()));
        }

        self.write_summary(report);
        Ok(())
    }

    fn format_manifest_short(&self, manifest: &ArchiveManifest) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for entry in &manifest.entries {
            let _ = self.term.write_line(&entry.name);
        }

        Ok(())
    }

    fn format_manifest_long(&self, manifest: &ArchiveManifest, human_readable: bool) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for entry in &manifest.entries {
            let size_str = if human_readable {
                humanize_bytes(entry.size)
            } else {
                entry.size.to_string()
            };

            let mut line = format!(
                "{}{:<6o} {:>10}  {}",
                Self::kind_char(&entry.kind),
                entry.mode,
                size_str,
                entry.name
            );
            if let EntryKind::Other { raw_type } = &entry.kind {
                line.push_str(&format!("  [{raw_type}, not extracted]"));
            }
            let _ = self.term.write_line(&line);
        }

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&format!(
            "Total: {} entries, {} ({})",
            Self::format_number(manifest.total_entries),
            humanize_bytes(manifest.total_size),
            manifest.format
        ));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_small() {
        assert_eq!(HumanFormatter::format_number(0), "0");
        assert_eq!(HumanFormatter::format_number(42), "42");
        assert_eq!(HumanFormatter::format_number(999), "999");
    }

    #[test]
    fn test_format_number_thousands() {
        assert_eq!(HumanFormatter::format_number(1000), "1,000");
        assert_eq!(HumanFormatter::format_number(1_234_567), "1,234,567");
        assert_eq!(
            HumanFormatter::format_number(123_456_789_012),
            "123,456,789,012"
        );
    }

    #[test]
    fn test_kind_char() {
        assert_eq!(HumanFormatter::kind_char(&EntryKind::Directory), 'd');
        assert_eq!(HumanFormatter::kind_char(&EntryKind::RegularFile), '-');
        assert_eq!(
            HumanFormatter::kind_char(&EntryKind::Other {
                raw_type: "symlink".into()
            }),
            '?'
        );
    }
}
