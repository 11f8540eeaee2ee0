//! Validated safe path type for archive extraction.

use crate::ArtifactError;
use crate::Result;
use std::ffi::OsStr;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use super::DestDir;

/// A normalized entry path that stays inside the destination directory.
///
/// `SafePath` is relative to the destination root. Joining it with
/// [`DestDir::join`] yields the absolute write path, which is always equal to
/// or a descendant of the root.
///
/// # Security Properties
///
/// - Can ONLY be constructed through [`SafePath::resolve`]
/// - NO `From<PathBuf>` implementation
/// - Contains only normal components (no `.`, `..`, root or prefix)
///
/// # Examples
///
/// ```no_run
/// use artifetch_core::types::DestDir;
/// use artifetch_core::types::SafePath;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new("/tmp")?;
///
/// let safe = SafePath::resolve("foo/./bar/../baz.txt", &dest)?;
/// assert_eq!(safe.as_path(), std::path::Path::new("foo/baz.txt"));
///
/// // Escaping the root is rejected
/// assert!(SafePath::resolve("../../etc/passwd", &dest).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SafePath(PathBuf);

impl SafePath {
    /// Resolves an archive entry name against the destination root.
    ///
    /// # Validation Steps
    ///
    /// 1. Reject names containing NUL bytes
    /// 2. Reject absolute names and drive prefixes
    /// 3. Normalize lexically: drop `.`, let `..` cancel the previous segment
    /// 4. Reject any `..` that would climb above the root
    /// 5. Canonicalize the nearest existing ancestor of the target and verify
    ///    it is still inside the destination (catches pre-existing symlinks)
    ///
    /// An entry that normalizes to nothing (e.g. `./` or `a/..`) resolves to
    /// the root itself.
    ///
    /// # Errors
    ///
    /// - `ArtifactError::PathTraversal` if the target would leave the root
    /// - `ArtifactError::InvalidEntryName` for names with NUL bytes
    /// - `ArtifactError::Io` if an existing ancestor cannot be inspected
    pub fn resolve(entry_name: &str, dest: &DestDir) -> Result<Self> {
        if entry_name.contains('\0') {
            return Err(ArtifactError::InvalidEntryName {
                name: entry_name.to_string(),
                reason: "name contains a NUL byte".into(),
            });
        }

        let traversal = || ArtifactError::PathTraversal {
            path: PathBuf::from(entry_name),
        };

        let mut segments: Vec<&OsStr> = Vec::new();
        for component in Path::new(entry_name).components() {
            match component {
                Component::Normal(segment) => segments.push(segment),
                Component::CurDir => {}
                Component::ParentDir => {
                    if segments.pop().is_none() {
                        return Err(traversal());
                    }
                }
                Component::RootDir | Component::Prefix(_) => return Err(traversal()),
            }
        }

        let relative: PathBuf = segments.iter().collect();
        verify_existing_ancestor(dest, &relative, entry_name)?;

        Ok(Self(relative))
    }

    /// Returns the path relative to the destination root.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Returns `true` if the entry resolved to the destination root itself.
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.as_os_str().is_empty()
    }
}

/// Canonicalizes the deepest existing ancestor of the target and checks that
/// it does not leave the destination.
///
/// A symlink anywhere on the way is resolved even when dangling: writing
/// through a dangling link creates its target, so a link that cannot be
/// resolved inside the destination is rejected.
fn verify_existing_ancestor(dest: &DestDir, relative: &Path, entry_name: &str) -> Result<()> {
    let target = dest.as_path().join(relative);
    let traversal = || ArtifactError::PathTraversal {
        path: PathBuf::from(entry_name),
    };

    for ancestor in target.ancestors() {
        if ancestor == dest.as_path() {
            return Ok(());
        }

        let metadata = match std::fs::symlink_metadata(ancestor) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(inspect_error(ancestor, &e)),
        };

        return match ancestor.canonicalize() {
            Ok(canonical) if canonical.starts_with(dest.as_path()) => Ok(()),
            Ok(_) => Err(traversal()),
            Err(_) if metadata.file_type().is_symlink() => Err(traversal()),
            Err(e) => Err(inspect_error(ancestor, &e)),
        };
    }

    Ok(())
}

fn inspect_error(path: &Path, e: &io::Error) -> ArtifactError {
    ArtifactError::Io(io::Error::new(
        e.kind(),
        format!("failed to canonicalize {}: {e}", path.display()),
    ))
}
