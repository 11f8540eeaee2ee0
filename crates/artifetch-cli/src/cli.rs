//! CLI argument parsing using clap.

use artifetch_core::ArchiveFormat;
use artifetch_core::FormatPreference;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "artifetch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a build artifact and extract it locally
    Pull(PullArgs),
    /// Extract a local archive file
    Extract(ExtractArgs),
    /// List archive contents without extraction
    List(ListArgs),
    /// Generate shell completion scripts
    Completion(CompletionArgs),
}

/// Container format selection.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArchiveType {
    /// Try tar first, fall back to zip
    #[default]
    Auto,
    /// tar+gzip only
    Tar,
    /// zip only
    Zip,
}

impl ArchiveType {
    pub const fn preference(self) -> FormatPreference {
        match self {
            Self::Auto => FormatPreference::Auto,
            Self::Tar => FormatPreference::Tar,
            Self::Zip => FormatPreference::Zip,
        }
    }

    /// `None` means detect from the file name.
    pub const fn format(self) -> Option<ArchiveFormat> {
        match self {
            Self::Auto => None,
            Self::Tar => Some(ArchiveFormat::TarGz),
            Self::Zip => Some(ArchiveFormat::Zip),
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct PullArgs {
    /// PR builder (repository) name
    #[arg(short, long, value_name = "REPO", value_parser = parse_repo)]
    pub repo: String,

    /// Job number
    #[arg(short, long, value_name = "JOB", value_parser = clap::value_parser!(u64).range(1..))]
    pub job: u64,

    /// Archive format to look for
    #[arg(long, value_enum, default_value_t = ArchiveType::Auto)]
    pub archive_type: ArchiveType,

    /// Bucket the artifact was uploaded to
    #[arg(long, value_name = "BUCKET")]
    pub bucket: Option<String>,

    /// Object store endpoint URL
    #[arg(long, value_name = "URL", conflicts_with = "mirror")]
    pub endpoint: Option<String>,

    /// Read artifacts from a local mirror directory instead of the network
    #[arg(long, value_name = "DIR")]
    pub mirror: Option<PathBuf>,

    /// Directory under which <bucket>/<repo>/<job> is created
    #[arg(long, value_name = "DIR")]
    pub output_root: Option<PathBuf>,

    /// Do not apply permission bits stored in the archive
    #[arg(long)]
    pub no_permissions: bool,
}

#[derive(clap::Args, Debug)]
pub struct ExtractArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Output directory (default: current directory)
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Archive format (default: detect from the file name)
    #[arg(long, value_enum, default_value_t = ArchiveType::Auto)]
    pub archive_type: ArchiveType,

    /// Do not apply permission bits stored in the archive
    #[arg(long)]
    pub no_permissions: bool,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Show detailed entry information
    #[arg(short, long)]
    pub long: bool,

    /// Show sizes in human-readable format
    #[arg(short = 'H', long)]
    pub human_readable: bool,

    /// Archive format (default: detect from the file name)
    #[arg(long, value_enum, default_value_t = ArchiveType::Auto)]
    pub archive_type: ArchiveType,
}

#[derive(clap::Args, Debug)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

fn parse_repo(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("repository name must not be empty".to_string());
    }
    Ok(trimmed.to_string())
}
