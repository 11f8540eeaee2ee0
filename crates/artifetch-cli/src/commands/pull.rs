//! Pull command implementation.

use crate::cli::PullArgs;
use crate::error::add_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use artifetch_core::ExtractOptions;
use artifetch_core::NoopProgress;
use artifetch_core::PullConfig;
use artifetch_core::fetch::DirectoryStore;
use artifetch_core::fetch::HttpObjectStore;
use artifetch_core::fetch::ObjectStore;
use artifetch_core::pull_with_progress;
use tracing::debug;

pub fn execute(args: &PullArgs, formatter: &dyn OutputFormatter, quiet: bool) -> Result<()> {
    let subject = format!("{} #{}", args.repo, args.job);
    let config = add_context(build_config(args), &subject)?;
    let store = add_context(build_store(args), &subject)?;
    let options = ExtractOptions {
        preserve_permissions: !args.no_permissions,
        ..ExtractOptions::default()
    };

    debug!(
        repo = config.repo(),
        job = config.job_number(),
        bucket = config.bucket(),
        destination = %config.destination_dir().display(),
        "starting pull"
    );

    let report = if CliProgress::should_show(quiet) {
        let mut progress = CliProgress::new("Extracting");
        add_context(
            pull_with_progress(&config, &*store, &options, &mut progress),
            &subject,
        )?
    } else {
        add_context(
            pull_with_progress(&config, &*store, &options, &mut NoopProgress),
            &subject,
        )?
    };

    formatter.format_pull_result(&report)
}

fn build_config(args: &PullArgs) -> artifetch_core::Result<PullConfig> {
    let config = match &args.output_root {
        Some(root) => PullConfig::with_root(&args.repo, args.job, root)?,
        None => PullConfig::new(&args.repo, args.job)?,
    };
    let config = match &args.bucket {
        Some(bucket) => config.with_bucket(bucket)?,
        None => config,
    };
    Ok(config.with_preference(args.archive_type.preference()))
}

fn build_store(args: &PullArgs) -> artifetch_core::Result<Box<dyn ObjectStore>> {
    if let Some(mirror) = &args.mirror {
        return Ok(Box::new(DirectoryStore::new(mirror)));
    }
    let store = match &args.endpoint {
        Some(endpoint) => HttpObjectStore::with_endpoint(endpoint)?,
        None => HttpObjectStore::new()?,
    };
    Ok(Box::new(store))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::ArchiveType;
    use artifetch_core::FormatPreference;
    use std::path::Path;
    use std::path::PathBuf;

    fn args() -> PullArgs {
        PullArgs {
            repo: "Hazelcast-EE-3.maintenance".into(),
            job: 128,
            archive_type: ArchiveType::Auto,
            bucket: None,
            endpoint: None,
            mirror: None,
            output_root: Some(PathBuf::from("/var/cache/artifacts")),
            no_permissions: false,
        }
    }

    #[test]
    fn test_build_config_defaults() {
        let config = build_config(&args()).unwrap();
        assert_eq!(config.bucket(), "j-artifacts");
        assert_eq!(config.preference(), FormatPreference::Auto);
        assert_eq!(
            config.destination_dir(),
            Path::new("/var/cache/artifacts/j-artifacts/Hazelcast-EE-3.maintenance/128")
        );
    }

    #[test]
    fn test_build_config_overrides() {
        let mut args = args();
        args.bucket = Some("other-bucket".into());
        args.archive_type = ArchiveType::Zip;

        let config = build_config(&args).unwrap();
        assert_eq!(config.bucket(), "other-bucket");
        assert_eq!(config.preference(), FormatPreference::Zip);
    }

    #[test]
    fn test_build_config_rejects_separator_in_repo() {
        let mut args = args();
        args.repo = "a/b".into();
        assert!(build_config(&args).is_err());
    }

    #[test]
    fn test_build_config_rejects_escaping_bucket() {
        let mut args = args();
        args.bucket = Some("../..".into());
        assert!(build_config(&args).is_err());
    }

    #[test]
    fn test_build_store_rejects_bad_endpoint() {
        let mut args = args();
        args.endpoint = Some("not a url".into());
        assert!(build_store(&args).is_err());
    }
}
