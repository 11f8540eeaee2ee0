//! Extraction root.

use crate::ArtifactError;
use crate::Result;
use std::io;
use std::path::Path;
use std::path::PathBuf;

/// The canonical, existing directory an archive is extracted into.
///
/// Every [`SafePath`](super::SafePath) is resolved against this root and
/// checked against its canonical form, so a root reached through a symlink
/// still contains everything written below it.
///
/// # Examples
///
/// ```no_run
/// use artifetch_core::types::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::create("/tmp/j-artifacts/my-repo/12")?;
/// println!("Extracting to: {}", dest.as_path().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestDir(PathBuf);

impl DestDir {
    /// Wraps an existing directory, canonicalizing it.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the path is missing, is not a directory, or cannot
    /// be canonicalized.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let metadata = std::fs::metadata(&path).map_err(|e| {
            io_error(
                e.kind(),
                format!("destination directory {}: {e}", path.display()),
            )
        })?;
        if !metadata.is_dir() {
            return Err(io_error(
                io::ErrorKind::InvalidInput,
                format!("destination is not a directory: {}", path.display()),
            ));
        }

        path.canonicalize().map(Self).map_err(|e| {
            io_error(
                e.kind(),
                format!("failed to canonicalize {}: {e}", path.display()),
            )
        })
    }

    /// Creates the directory and any missing ancestors, then wraps it.
    ///
    /// An already existing directory is not an error.
    ///
    /// # Errors
    ///
    /// Returns `WriteFailed` if the directory cannot be created, or any
    /// error of [`DestDir::new`].
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        std::fs::create_dir_all(&path).map_err(|source| ArtifactError::WriteFailed {
            path: path.clone(),
            source,
        })?;
        Self::new(path)
    }

    /// Canonical path of the root.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Absolute write path for a resolved entry.
    #[inline]
    #[must_use]
    pub fn join(&self, safe_path: &super::SafePath) -> PathBuf {
        self.0.join(safe_path.as_path())
    }

    /// Unwraps the canonical path.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

fn io_error(kind: io::ErrorKind, message: String) -> ArtifactError {
    ArtifactError::Io(io::Error::new(kind, message))
}
