//! Decoded archive entries.

use std::fmt;
use std::io::Read;

/// Kind of entry decoded from an archive.
///
/// Only directories and regular files are materialized. Every other record
/// type (symlinks, hardlinks, device nodes, FIFOs) is reported as `Other` and
/// skipped by the materializer.
///
/// # Examples
///
/// ```
/// use artifetch_core::types::EntryKind;
///
/// let kind = EntryKind::Other {
///     raw_type: "symlink".into(),
/// };
/// assert!(!kind.is_materialized());
/// assert!(EntryKind::RegularFile.is_materialized());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Directory entry.
    Directory,

    /// Regular file entry with content.
    RegularFile,

    /// Any other record type.
    Other {
        /// Short description of the raw record type, for diagnostics.
        raw_type: String,
    },
}

impl EntryKind {
    /// Returns `true` if this is a directory.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self, Self::Directory)
    }

    /// Returns `true` if this is a regular file.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::RegularFile)
    }

    /// Returns `true` if entries of this kind are written to disk.
    #[must_use]
    pub const fn is_materialized(&self) -> bool {
        matches!(self, Self::Directory | Self::RegularFile)
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory => f.write_str("directory"),
            Self::RegularFile => f.write_str("file"),
            Self::Other { raw_type } => f.write_str(raw_type),
        }
    }
}

/// One entry produced by an archive reader.
///
/// Entries borrow their content stream from the reader, so they only live for
/// the duration of a single visitor call. The content is present for regular
/// files and absent for every other kind.
pub struct ArchiveEntry<'a> {
    /// Archive-relative name as stored, using forward slashes. Never empty.
    pub name: String,

    /// Entry kind.
    pub kind: EntryKind,

    /// POSIX permission bits (`mode & 0o7777`).
    pub mode: u32,

    /// Uncompressed size recorded in the archive header.
    pub size: u64,

    /// Lazy content stream, only for regular files.
    pub content: Option<&'a mut dyn Read>,
}

impl fmt::Debug for ArchiveEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveEntry")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("mode", &format_args!("{:o}", self.mode))
            .field("size", &self.size)
            .field("has_content", &self.content.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_entry_kind_predicates() {
        assert!(EntryKind::Directory.is_directory());
        assert!(!EntryKind::Directory.is_file());
        assert!(EntryKind::RegularFile.is_file());

        let other = EntryKind::Other {
            raw_type: "fifo".into(),
        };
        assert!(!other.is_directory());
        assert!(!other.is_file());
        assert!(!other.is_materialized());
    }

    #[test]
    fn test_entry_kind_display() {
        assert_eq!(EntryKind::Directory.to_string(), "directory");
        assert_eq!(EntryKind::RegularFile.to_string(), "file");
        let other = EntryKind::Other {
            raw_type: "hardlink".into(),
        };
        assert_eq!(other.to_string(), "hardlink");
    }

    #[test]
    fn test_entry_debug_omits_content() {
        let mut data = Cursor::new(b"hi".to_vec());
        let entry = ArchiveEntry {
            name: "a/b.txt".into(),
            kind: EntryKind::RegularFile,
            mode: 0o644,
            size: 2,
            content: Some(&mut data),
        };
        let debug = format!("{entry:?}");
        assert!(debug.contains("a/b.txt"));
        assert!(debug.contains("644"));
        assert!(debug.contains("has_content: true"));
    }
}
