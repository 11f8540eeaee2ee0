//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::error::add_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Context;
use anyhow::Result;
use artifetch_core::ExtractOptions;
use artifetch_core::NoopProgress;
use artifetch_core::extract_archive_with_progress;
use std::env;

pub fn execute(args: &ExtractArgs, formatter: &dyn OutputFormatter, quiet: bool) -> Result<()> {
    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("failed to get current directory")?,
    };

    let options = ExtractOptions {
        preserve_permissions: !args.no_permissions,
        ..ExtractOptions::default()
    };
    let format = args.archive_type.format();
    let subject = format!("archive '{}'", args.archive.display());

    let report = if CliProgress::should_show(quiet) {
        let mut progress = CliProgress::new("Extracting");
        add_context(
            extract_archive_with_progress(
                &args.archive,
                format,
                &output_dir,
                &options,
                &mut progress,
            ),
            &subject,
        )?
    } else {
        add_context(
            extract_archive_with_progress(
                &args.archive,
                format,
                &output_dir,
                &options,
                &mut NoopProgress,
            ),
            &subject,
        )?
    };

    formatter.format_extraction_result(&output_dir, &report)
}
