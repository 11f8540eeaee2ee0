//! Error conversion utilities for CLI.
//!
//! Converts artifetch-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::Result;
use anyhow::anyhow;
use artifetch_core::ArtifactError;

/// Converts `ArtifactError` to a user-friendly anyhow error.
///
/// `subject` names what was being processed, e.g. an archive path or a
/// `repo #job` pair.
///
/// A `ReleaseFailed` is reported as its primary error, so a wrapped security
/// violation keeps its label, with the release failure appended.
pub fn convert_error(err: ArtifactError, subject: &str) -> anyhow::Error {
    match err {
        ArtifactError::ReleaseFailed { primary, release } => {
            let primary = convert_error(*primary, subject);
            anyhow!("{primary:#}\nNOTE: releasing the resource also failed: {release}")
        }
        ArtifactError::PathTraversal { path } => {
            anyhow!(
                "Security violation: '{}' attempted path traversal with '{}'\n\
                 HINT: This archive may be malicious. Do not extract from untrusted sources.",
                subject,
                path.display()
            )
        }
        ArtifactError::InvalidEntryName { name, reason } => {
            anyhow!(
                "Security violation: '{subject}' contains an invalid entry name {name:?}: {reason}"
            )
        }
        ArtifactError::NoArchiveFound { repo, job } => {
            anyhow!(
                "No artifact found for {repo} job {job}\n\
                 HINT: Check the repository name and job number, or pass --bucket if the \
                 artifact was uploaded elsewhere."
            )
        }
        ArtifactError::AccessDenied { key } => {
            anyhow!(
                "Access denied while fetching '{key}' for {subject}\n\
                 HINT: The bucket may not be public, or the endpoint requires credentials."
            )
        }
        ArtifactError::Transport { key, reason } => {
            anyhow!(
                "Failed to download '{key}' for {subject}: {reason}\n\
                 HINT: Check network access and the --endpoint value."
            )
        }
        ArtifactError::UnsupportedFormat => {
            anyhow!(
                "Archive format not supported: {subject}\n\
                 HINT: Supported formats: tar (gzip-compressed), zip. Use --archive-type to \
                 override detection."
            )
        }
        ArtifactError::InvalidArchive { archive, reason } => {
            anyhow!(
                "Invalid archive '{}': {}\n\
                 HINT: The archive may be corrupted or truncated.",
                archive.display(),
                reason
            )
        }
        ArtifactError::CorruptEntry { entry, source } => {
            anyhow!(
                "Corrupt entry '{}' in {}: {}\n\
                 HINT: The archive may be corrupted or truncated.",
                entry.display(),
                subject,
                source
            )
        }
        ArtifactError::Io(io_err) => {
            anyhow!("I/O error while processing {subject}: {io_err}")
        }
        _ => anyhow::Error::from(err).context(format!("Error processing {subject}")),
    }
}

/// Adds context to a core result.
pub fn add_context<T>(result: Result<T, ArtifactError>, subject: &str) -> anyhow::Result<T> {
    result.map_err(|e| convert_error(e, subject))
}
