//! High-level public API for pulling and extracting artifacts.

use std::path::Path;

use tracing::info;
use tracing::warn;

use crate::ExtractOptions;
use crate::ExtractionReport;
use crate::ProgressCallback;
use crate::PullConfig;
use crate::PullReport;
use crate::Result;
use crate::extraction::Materializer;
use crate::fetch::FormatResolver;
use crate::fetch::ObjectStore;
use crate::fetch::staging::remove_staging_file;
use crate::formats::ArchiveFormat;
use crate::formats::ArchiveReader;
use crate::formats::detect_format;
use crate::report::NoopProgress;
use crate::types::DestDir;

/// Fetches, extracts and cleans up one artifact archive.
///
/// Steps, in order:
///
/// 1. Resolve the archive format and download it into the destination
///    directory (tar first, zip if the tar object does not exist)
/// 2. Extract it into `<output_root>/<bucket>/<repo>/<job>`
/// 3. Delete the downloaded staging file
///
/// If extraction fails the staging file is kept for inspection and the
/// partially written tree is left as-is.
///
/// # Errors
///
/// Returns the first fetch, extraction or cleanup error. A cleanup failure
/// after a successful extraction is reported as `ArtifactError::Cleanup`.
///
/// # Examples
///
/// ```no_run
/// use artifetch_core::ExtractOptions;
/// use artifetch_core::PullConfig;
/// use artifetch_core::fetch::HttpObjectStore;
/// use artifetch_core::pull;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = PullConfig::new("Hazelcast-EE-3.maintenance", 128)?;
/// let store = HttpObjectStore::new()?;
///
/// let report = pull(&config, &store, &ExtractOptions::default())?;
/// println!("Done. Uncompressed file is here --> {}", report.destination.display());
/// # Ok(())
/// # }
/// ```
pub fn pull<S: ObjectStore + ?Sized>(
    config: &PullConfig,
    store: &S,
    options: &ExtractOptions,
) -> Result<PullReport> {
    pull_with_progress(config, store, options, &mut NoopProgress)
}

/// Same as [`pull`], reporting extraction progress.
///
/// # Errors
///
/// Returns the first fetch, extraction or cleanup error.
pub fn pull_with_progress<S: ObjectStore + ?Sized>(
    config: &PullConfig,
    store: &S,
    options: &ExtractOptions,
    progress: &mut dyn ProgressCallback,
) -> Result<PullReport> {
    let staged = FormatResolver::new(config, store).resolve_and_fetch()?;
    let dest = DestDir::new(config.destination_dir())?;

    let extraction = match extract_staged(&staged.path, staged.format, &dest, options, progress) {
        Ok(report) => report,
        Err(e) => {
            warn!(
                staging = %staged.path.display(),
                "extraction failed, keeping staging file"
            );
            return Err(e);
        }
    };

    remove_staging_file(&staged.path)?;

    info!(
        destination = %dest.as_path().display(),
        key = %staged.remote_key,
        "artifact ready"
    );

    Ok(PullReport {
        destination: dest.into_path_buf(),
        format: staged.format,
        remote_key: staged.remote_key,
        attempts: staged.attempts,
        extraction,
    })
}

fn extract_staged(
    archive_path: &Path,
    format: ArchiveFormat,
    dest: &DestDir,
    options: &ExtractOptions,
    progress: &mut dyn ProgressCallback,
) -> Result<ExtractionReport> {
    let reader = ArchiveReader::open(archive_path, format)?;
    Materializer::new(dest, options).materialize_with_progress(reader, progress)
}

/// Extracts a local archive into `output_dir`.
///
/// The output directory and its ancestors are created if missing. When
/// `format` is `None` it is detected from the archive file name.
///
/// # Errors
///
/// Returns an error if:
/// - The archive cannot be opened or its format is unsupported
/// - An entry would escape `output_dir`
/// - The archive is corrupt
/// - I/O operations fail
///
/// # Examples
///
/// ```no_run
/// use artifetch_core::ExtractOptions;
/// use artifetch_core::extract_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = extract_archive("128.tar", None, "/tmp/output", &ExtractOptions::default())?;
/// println!("Extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
pub fn extract_archive<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    format: Option<ArchiveFormat>,
    output_dir: Q,
    options: &ExtractOptions,
) -> Result<ExtractionReport> {
    extract_archive_with_progress(archive_path, format, output_dir, options, &mut NoopProgress)
}

/// Same as [`extract_archive`], reporting progress.
///
/// # Errors
///
/// See [`extract_archive`].
pub fn extract_archive_with_progress<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    format: Option<ArchiveFormat>,
    output_dir: Q,
    options: &ExtractOptions,
    progress: &mut dyn ProgressCallback,
) -> Result<ExtractionReport> {
    let archive_path = archive_path.as_ref();
    let format = match format {
        Some(format) => format,
        None => detect_format(archive_path)?,
    };
    let dest = DestDir::create(output_dir.as_ref())?;
    extract_staged(archive_path, format, &dest, options, progress)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ArtifactError;
    use crate::fetch::DirectoryStore;
    use crate::test_utils::TarGzBuilder;
    use crate::test_utils::ZipBuilder;
    use crate::test_utils::write_fixture;
    use tempfile::TempDir;

    #[test]
    fn test_extract_archive_detects_format() {
        let temp = TempDir::new().unwrap();
        let archive = write_fixture(
            temp.path(),
            "in.zip",
            &ZipBuilder::new().add_file("f.txt", b"zip").build(),
        );
        let out = temp.path().join("out").join("nested");

        let report = extract_archive(&archive, None, &out, &ExtractOptions::default()).unwrap();

        assert_eq!(report.files_extracted, 1);
        assert_eq!(std::fs::read_to_string(out.join("f.txt")).unwrap(), "zip");
    }

    #[test]
    fn test_pull_from_mirror_removes_staging_file() {
        let mirror = TempDir::new().unwrap();
        write_fixture(
            mirror.path(),
            "j-artifacts/repo/9/repo-9.tar",
            &TarGzBuilder::new().add_file("out.txt", b"done").build(),
        );
        let root = TempDir::new().unwrap();
        let config = PullConfig::with_root("repo", 9, root.path()).unwrap();

        let report = pull(
            &config,
            &DirectoryStore::new(mirror.path()),
            &ExtractOptions::default(),
        )
        .unwrap();

        assert_eq!(report.format, ArchiveFormat::TarGz);
        assert_eq!(report.attempts, 1);
        let dest = config.destination_dir();
        assert_eq!(std::fs::read_to_string(dest.join("out.txt")).unwrap(), "done");
        assert!(!config.staging_path(ArchiveFormat::TarGz).exists());
    }

    #[test]
    fn test_pull_entry_named_like_staging_file() {
        let mirror = TempDir::new().unwrap();
        write_fixture(
            mirror.path(),
            "j-artifacts/repo/9/repo-9.zip",
            &ZipBuilder::new()
                .add_file("keep.txt", b"kept")
                .add_file("9.zip", b"inner artifact")
                .build(),
        );
        let root = TempDir::new().unwrap();
        let config = PullConfig::with_root("repo", 9, root.path()).unwrap();

        let report = pull(
            &config,
            &DirectoryStore::new(mirror.path()),
            &ExtractOptions::default(),
        )
        .unwrap();

        assert_eq!(report.extraction.files_extracted, 2);
        let dest = config.destination_dir();
        assert_eq!(std::fs::read(dest.join("9.zip")).unwrap(), b"inner artifact");
        assert_eq!(std::fs::read(dest.join("keep.txt")).unwrap(), b"kept");
        assert!(!config.staging_path(ArchiveFormat::Zip).exists());
    }

    #[test]
    fn test_pull_keeps_staging_file_on_extraction_failure() {
        let mirror = TempDir::new().unwrap();
        write_fixture(
            mirror.path(),
            "j-artifacts/repo/9/repo-9.zip",
            &ZipBuilder::new().add_file("../escape.txt", b"x").build(),
        );
        let root = TempDir::new().unwrap();
        let config = PullConfig::with_root("repo", 9, root.path()).unwrap();

        let err = pull(
            &config,
            &DirectoryStore::new(mirror.path()),
            &ExtractOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, ArtifactError::PathTraversal { .. }));
        assert!(config.staging_path(ArchiveFormat::Zip).exists());
        assert!(!config.destination_dir().parent().unwrap().join("escape.txt").exists());
    }
}
