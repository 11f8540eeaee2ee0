//! Archive manifest types.

use crate::formats::ArchiveFormat;
use crate::types::EntryKind;

/// Metadata of one archive entry, as listed without extracting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Entry name as stored in the archive.
    pub name: String,
    /// Entry kind.
    pub kind: EntryKind,
    /// Permission bits.
    pub mode: u32,
    /// Uncompressed size in bytes.
    pub size: u64,
}

/// Listing of an archive's entries in storage order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveManifest {
    /// Container format.
    pub format: ArchiveFormat,
    /// Entries in storage order.
    pub entries: Vec<ManifestEntry>,
    /// Number of entries.
    pub total_entries: usize,
    /// Sum of the uncompressed sizes of all regular files.
    pub total_size: u64,
}

impl ArchiveManifest {
    /// Creates an empty manifest.
    #[must_use]
    pub fn new(format: ArchiveFormat) -> Self {
        Self {
            format,
            entries: Vec::new(),
            total_entries: 0,
            total_size: 0,
        }
    }

    /// Appends an entry and updates the totals.
    pub fn add_entry(&mut self, entry: ManifestEntry) {
        self.total_entries += 1;
        if entry.kind.is_file() {
            self.total_size = self.total_size.saturating_add(entry.size);
        }
        self.entries.push(entry);
    }

    /// Number of entries that extraction would skip.
    #[must_use]
    pub fn unsupported_entries(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| !e.kind.is_materialized())
            .count()
    }
}
