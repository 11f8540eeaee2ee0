//! Choosing between the tar and zip artifact.
//!
//! Builds publish either `<repo>-<job>.tar` or `<repo>-<job>.zip`. The
//! resolver asks for the candidates in order and moves to the next one only
//! when the store says the previous key does not exist.

use std::path::PathBuf;

use tracing::debug;
use tracing::info;

use crate::ArtifactError;
use crate::PullConfig;
use crate::Result;
use crate::formats::ArchiveFormat;

use super::ObjectStore;

/// One fetch attempt for a single format candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchAttempt {
    /// Object key requested from the store.
    pub remote_key: String,
    /// Local path the object is downloaded to.
    pub staging_path: PathBuf,
    /// Format the object is expected to be in.
    pub format: ArchiveFormat,
}

impl FetchAttempt {
    /// Derives the attempt for `format` from the pull configuration.
    #[must_use]
    pub fn new(config: &PullConfig, format: ArchiveFormat) -> Self {
        Self {
            remote_key: config.remote_key(format),
            staging_path: config.staging_path(format),
            format,
        }
    }
}

/// A downloaded archive waiting to be extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedArchive {
    /// Local staging file.
    pub path: PathBuf,
    /// Container format of the staging file.
    pub format: ArchiveFormat,
    /// Remote key the archive was fetched from.
    pub remote_key: String,
    /// Number of fetch attempts, including the successful one.
    pub attempts: usize,
    /// Size of the staging file in bytes.
    pub bytes: u64,
}

/// Fetches the first archive format that exists in the store.
///
/// # Examples
///
/// ```no_run
/// use artifetch_core::PullConfig;
/// use artifetch_core::fetch::DirectoryStore;
/// use artifetch_core::fetch::FormatResolver;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = PullConfig::with_root("repo", 3, "/tmp/artifacts")?;
/// let store = DirectoryStore::new("/srv/mirror");
///
/// let staged = FormatResolver::new(&config, &store).resolve_and_fetch()?;
/// println!("{} staged at {}", staged.format, staged.path.display());
/// # Ok(())
/// # }
/// ```
pub struct FormatResolver<'a, S: ObjectStore + ?Sized> {
    config: &'a PullConfig,
    store: &'a S,
}

impl<'a, S: ObjectStore + ?Sized> FormatResolver<'a, S> {
    /// Creates a resolver for one pull.
    #[must_use]
    pub fn new(config: &'a PullConfig, store: &'a S) -> Self {
        Self { config, store }
    }

    /// Tries each candidate format in order and stages the first one found.
    ///
    /// The destination directory is created first; this also creates the
    /// parent that holds the staging file.
    ///
    /// # Errors
    ///
    /// - `NoArchiveFound` if every candidate was reported missing
    /// - any non-`NotFound` store error, unchanged, without further attempts
    /// - `WriteFailed` if the destination directory cannot be created
    pub fn resolve_and_fetch(&self) -> Result<StagedArchive> {
        let destination = self.config.destination_dir();
        std::fs::create_dir_all(&destination).map_err(|source| ArtifactError::WriteFailed {
            path: destination.clone(),
            source,
        })?;

        let bucket = self.config.bucket();
        let candidates = self.config.preference().candidates();

        for (index, &format) in candidates.iter().enumerate() {
            let attempt = FetchAttempt::new(self.config, format);
            debug!(
                bucket,
                key = %attempt.remote_key,
                staging = %attempt.staging_path.display(),
                "fetching archive"
            );

            match self
                .store
                .fetch(bucket, &attempt.remote_key, &attempt.staging_path)
            {
                Ok(bytes) => {
                    info!(key = %attempt.remote_key, bytes, %format, "fetched archive");
                    return Ok(StagedArchive {
                        path: attempt.staging_path,
                        format,
                        remote_key: attempt.remote_key,
                        attempts: index + 1,
                        bytes,
                    });
                }
                Err(e) if e.is_not_found() => match candidates.get(index + 1) {
                    Some(next) => {
                        info!(key = %attempt.remote_key, next = %next, "archive not found, trying alternate format");
                    }
                    None => debug!(key = %attempt.remote_key, "archive not found"),
                },
                Err(e) => return Err(e),
            }
        }

        Err(ArtifactError::NoArchiveFound {
            repo: self.config.repo().to_string(),
            job: self.config.job_number(),
        })
    }
}
