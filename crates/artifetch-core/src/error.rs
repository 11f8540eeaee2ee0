//! Error types for artifact fetch and extraction operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ArtifactError`.
pub type Result<T> = std::result::Result<T, ArtifactError>;

/// Errors that can occur while fetching or extracting an artifact archive.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The remote object store has no object under the requested key.
    #[error("object not found: {key}")]
    NotFound {
        /// The remote key that was requested.
        key: String,
    },

    /// Neither candidate archive format exists for the requested job.
    #[error("no archive found for {repo} job {job}")]
    NoArchiveFound {
        /// Repository name.
        repo: String,
        /// Job number.
        job: u64,
    },

    /// The object store refused access to the requested key.
    #[error("access denied: {key}")]
    AccessDenied {
        /// The remote key that was requested.
        key: String,
    },

    /// The object store could not be reached or returned an unexpected reply.
    #[error("transport error fetching {key}: {reason}")]
    Transport {
        /// The remote key that was requested.
        key: String,
        /// Description of the failure.
        reason: String,
    },

    /// Archive format is unsupported or unrecognized.
    #[error("unsupported archive format")]
    UnsupportedFormat,

    /// Archive container or compression envelope is corrupted.
    #[error("invalid archive {archive}: {reason}")]
    InvalidArchive {
        /// Path of the archive being read.
        archive: PathBuf,
        /// Decoder error message.
        reason: String,
    },

    /// Entry content could not be decoded while it was being copied.
    #[error("corrupt content in entry {entry}: {source}")]
    CorruptEntry {
        /// Archive-relative entry name.
        entry: PathBuf,
        /// Underlying read error.
        source: std::io::Error,
    },

    /// Path traversal attempt detected.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The entry name that attempted traversal.
        path: PathBuf,
    },

    /// Entry name cannot be represented on the local filesystem.
    #[error("invalid entry name {name:?}: {reason}")]
    InvalidEntryName {
        /// The raw entry name.
        name: String,
        /// Why the name was rejected.
        reason: String,
    },

    /// Writing an extracted entry to disk failed.
    #[error("failed to write {path}: {source}")]
    WriteFailed {
        /// Local path being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An operation failed and releasing its resource failed as well.
    #[error("{primary} (releasing the resource also failed: {release})")]
    ReleaseFailed {
        /// The error that aborted the operation.
        primary: Box<ArtifactError>,
        /// The error raised while releasing the resource.
        release: std::io::Error,
    },

    /// The staging file could not be removed after extraction.
    #[error("failed to remove staging file {path}: {source}")]
    Cleanup {
        /// Staging file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Configuration values are invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Reason the configuration was rejected.
        reason: String,
    },

    /// Extraction was cancelled between entries.
    #[error("extraction cancelled")]
    Cancelled,
}

impl ArtifactError {
    /// Returns `true` if the remote store reported the key as absent.
    ///
    /// Only this condition triggers the tar to zip fallback.
    ///
    /// # Examples
    ///
    /// ```
    /// use artifetch_core::ArtifactError;
    ///
    /// let err = ArtifactError::NotFound {
    ///     key: "repo/1/repo-1.tar".into(),
    /// };
    /// assert!(err.is_not_found());
    ///
    /// let err = ArtifactError::AccessDenied {
    ///     key: "repo/1/repo-1.tar".into(),
    /// };
    /// assert!(!err.is_not_found());
    /// ```
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this error represents a security violation.
    ///
    /// Callers should flag these separately from ordinary I/O failures.
    ///
    /// # Examples
    ///
    /// ```
    /// use artifetch_core::ArtifactError;
    /// use std::path::PathBuf;
    ///
    /// let err = ArtifactError::PathTraversal {
    ///     path: PathBuf::from("../etc/passwd"),
    /// };
    /// assert!(err.is_security_violation());
    ///
    /// let err = ArtifactError::UnsupportedFormat;
    /// assert!(!err.is_security_violation());
    /// ```
    #[must_use]
    pub fn is_security_violation(&self) -> bool {
        match self {
            Self::PathTraversal { .. } | Self::InvalidEntryName { .. } => true,
            Self::ReleaseFailed { primary, .. } => primary.is_security_violation(),
            _ => false,
        }
    }

    /// Returns `true` if the archive data itself is malformed.
    #[must_use]
    pub fn is_decode_error(&self) -> bool {
        match self {
            Self::UnsupportedFormat | Self::InvalidArchive { .. } | Self::CorruptEntry { .. } => {
                true
            }
            Self::ReleaseFailed { primary, .. } => primary.is_decode_error(),
            _ => false,
        }
    }

    /// Returns the entry name this error refers to, if any.
    #[must_use]
    pub fn entry_path(&self) -> Option<&std::path::Path> {
        match self {
            Self::PathTraversal { path } => Some(path),
            Self::CorruptEntry { entry, .. } => Some(entry),
            Self::ReleaseFailed { primary, .. } => primary.entry_path(),
            _ => None,
        }
    }

    /// Merges an error raised while releasing a resource into this error.
    #[must_use]
    pub fn with_release_error(self, release: std::io::Error) -> Self {
        Self::ReleaseFailed {
            primary: Box::new(self),
            release,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_display() {
        let err = ArtifactError::UnsupportedFormat;
        assert_eq!(err.to_string(), "unsupported archive format");
    }

    #[test]
    fn test_path_traversal_error() {
        let err = ArtifactError::PathTraversal {
            path: PathBuf::from("../etc/passwd"),
        };
        assert!(err.to_string().contains("path traversal"));
        assert!(err.to_string().contains("../etc/passwd"));
        assert!(err.is_security_violation());
        assert!(!err.is_decode_error());
    }

    #[test]
    fn test_no_archive_found_display() {
        let err = ArtifactError::NoArchiveFound {
            repo: "Hazelcast-EE".into(),
            job: 42,
        };
        assert_eq!(err.to_string(), "no archive found for Hazelcast-EE job 42");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: ArtifactError = io_err.into();
        assert!(matches!(err, ArtifactError::Io(_)));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_decode_errors() {
        let err = ArtifactError::InvalidArchive {
            archive: PathBuf::from("1.tar"),
            reason: "bad gzip header".into(),
        };
        assert!(err.is_decode_error());
        assert!(err.to_string().contains("1.tar"));

        let err = ArtifactError::CorruptEntry {
            entry: PathBuf::from("a/b.txt"),
            source: io::Error::new(io::ErrorKind::InvalidData, "crc mismatch"),
        };
        assert!(err.is_decode_error());
        assert_eq!(err.entry_path(), Some(std::path::Path::new("a/b.txt")));
    }

    #[test]
    fn test_release_error_keeps_primary_classification() {
        let primary = ArtifactError::PathTraversal {
            path: PathBuf::from("../x"),
        };
        let merged = primary.with_release_error(io::Error::other("close failed"));
        assert!(merged.is_security_violation());
        assert_eq!(merged.entry_path(), Some(std::path::Path::new("../x")));

        let display = merged.to_string();
        assert!(display.contains("path traversal"));
        assert!(display.contains("close failed"));
    }

    #[test]
    fn test_cleanup_error_display() {
        let err = ArtifactError::Cleanup {
            path: PathBuf::from("/tmp/7.zip"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("staging file"));
        assert!(err.to_string().contains("/tmp/7.zip"));
    }
}
