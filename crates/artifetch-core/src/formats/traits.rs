//! Common trait for archive format readers.

use crate::Result;
use crate::types::ArchiveEntry;

use super::ArchiveFormat;

/// Sequential decoder over the entries of one archive.
///
/// Entries borrow their content from the underlying decoder, so they are
/// handed to a visitor one at a time instead of being returned by an
/// iterator. Iteration happens in storage order and stops at the first error,
/// either from decoding or from the visitor.
pub trait EntryReader {
    /// Decodes every entry and passes it to `visit`.
    ///
    /// Returns the number of entries visited. A reader can be walked once;
    /// calling this again is an error for streaming formats.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArchive` for container decode errors, or the first
    /// error returned by `visit`.
    fn read_entries(
        &mut self,
        visit: &mut dyn FnMut(ArchiveEntry<'_>) -> Result<()>,
    ) -> Result<usize>;

    /// Returns the container format being read.
    fn format(&self) -> ArchiveFormat;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntryKind;

    struct SingleDir;

    impl EntryReader for SingleDir {
        fn read_entries(
            &mut self,
            visit: &mut dyn FnMut(ArchiveEntry<'_>) -> Result<()>,
        ) -> Result<usize> {
            visit(ArchiveEntry {
                name: "a/".into(),
                kind: EntryKind::Directory,
                mode: 0o755,
                size: 0,
                content: None,
            })?;
            Ok(1)
        }

        fn format(&self) -> ArchiveFormat {
            ArchiveFormat::Zip
        }
    }

    #[test]
    fn test_trait_object_visits_entries() {
        let mut reader: Box<dyn EntryReader> = Box::new(SingleDir);
        let mut names = Vec::new();
        let count = reader
            .read_entries(&mut |entry| {
                names.push(entry.name);
                Ok(())
            })
            .unwrap_or_default();
        assert_eq!(count, 1);
        assert_eq!(names, vec!["a/".to_string()]);
        assert_eq!(reader.format(), ArchiveFormat::Zip);
    }
}
