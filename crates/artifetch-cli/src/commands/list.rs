//! List command implementation

use crate::cli::ListArgs;
use crate::error::add_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use artifetch_core::list_archive;

pub fn execute(args: &ListArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let manifest = add_context(
        list_archive(&args.archive, args.archive_type.format()),
        &format!("archive '{}'", args.archive.display()),
    )?;

    if args.long {
        formatter.format_manifest_long(&manifest, args.human_readable)
    } else {
        formatter.format_manifest_short(&manifest)
    }
}
