//! Object store backed by a local directory tree.

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use crate::ArtifactError;
use crate::Result;

use super::ObjectStore;
use super::staging::write_staging_file;

/// Serves objects from `<root>/<bucket>/<key>`.
///
/// Useful for offline mirrors of the artifact bucket and for tests.
///
/// # Examples
///
/// ```no_run
/// use artifetch_core::fetch::DirectoryStore;
/// use artifetch_core::fetch::ObjectStore;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = DirectoryStore::new("/srv/mirror");
/// store.fetch("j-artifacts", "repo/3/repo-3.tar", Path::new("/tmp/3.tar"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Creates a store rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Mirror root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Local path an object is read from.
    #[must_use]
    pub fn object_path(&self, bucket: &str, key: &str) -> PathBuf {
        key.split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.root.join(bucket), |path, segment| path.join(segment))
    }
}

impl ObjectStore for DirectoryStore {
    fn fetch(&self, bucket: &str, key: &str, dest: &Path) -> Result<u64> {
        let source = self.object_path(bucket, key);
        debug!(path = %source.display(), "reading mirrored object");

        let mut file = File::open(&source).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ArtifactError::NotFound {
                key: key.to_string(),
            },
            ErrorKind::PermissionDenied => ArtifactError::AccessDenied {
                key: key.to_string(),
            },
            _ => ArtifactError::Transport {
                key: key.to_string(),
                reason: e.to_string(),
            },
        })?;

        if file.metadata().is_ok_and(|m| m.is_dir()) {
            return Err(ArtifactError::NotFound {
                key: key.to_string(),
            });
        }

        write_staging_file(&mut file, dest, key)
    }
}
