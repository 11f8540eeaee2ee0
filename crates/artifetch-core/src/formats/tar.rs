//! Tar+gzip archive reader.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use flate2::read::GzDecoder;
use tracing::trace;

use crate::ArtifactError;
use crate::Result;
use crate::types::ArchiveEntry;
use crate::types::EntryKind;

use super::ArchiveFormat;
use super::EntryReader;

/// Streaming reader for gzip-compressed tar archives.
///
/// The gzip envelope and the tar records are decoded on the fly; nothing is
/// buffered beyond the current entry. The archive can be walked once.
pub struct TarGzReader {
    archive: tar::Archive<GzDecoder<BufReader<File>>>,
    path: PathBuf,
}

impl TarGzReader {
    /// Wraps an open archive file.
    #[must_use]
    pub fn new(file: File, path: &Path) -> Self {
        let decoder = GzDecoder::new(BufReader::new(file));
        Self {
            archive: tar::Archive::new(decoder),
            path: path.to_path_buf(),
        }
    }
}

impl EntryReader for TarGzReader {
    fn read_entries(
        &mut self,
        visit: &mut dyn FnMut(ArchiveEntry<'_>) -> Result<()>,
    ) -> Result<usize> {
        let archive_path = self.path.clone();
        let invalid = |reason: String| ArtifactError::InvalidArchive {
            archive: archive_path.clone(),
            reason,
        };

        let entries = self
            .archive
            .entries()
            .map_err(|e| invalid(format!("failed to read TAR entries: {e}")))?;

        let mut count = 0;
        for entry_result in entries {
            let mut entry =
                entry_result.map_err(|e| invalid(format!("failed to read TAR entry: {e}")))?;

            let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
            if name.is_empty() {
                return Err(invalid("entry with an empty name".into()));
            }

            let kind = convert_tar_entry_type(entry.header().entry_type());
            let mode = match entry.header().mode() {
                Ok(mode) => mode & 0o7777,
                Err(e) if kind.is_materialized() => {
                    return Err(invalid(format!("invalid mode for {name}: {e}")));
                }
                Err(_) => 0,
            };
            let size = entry.size();

            trace!(entry = %name, %kind, mode = format_args!("{mode:o}"), size, "decoded tar entry");

            let content: Option<&mut dyn Read> = if kind.is_file() {
                Some(&mut entry)
            } else {
                None
            };

            visit(ArchiveEntry {
                name,
                kind,
                mode,
                size,
                content,
            })?;
            count += 1;
        }

        Ok(count)
    }

    fn format(&self) -> ArchiveFormat {
        ArchiveFormat::TarGz
    }
}

impl std::fmt::Debug for TarGzReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TarGzReader")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

fn convert_tar_entry_type(entry_type: tar::EntryType) -> EntryKind {
    let raw_type = match entry_type {
        tar::EntryType::Regular | tar::EntryType::Continuous | tar::EntryType::GNUSparse => {
            return EntryKind::RegularFile;
        }
        tar::EntryType::Directory => return EntryKind::Directory,
        tar::EntryType::Symlink => "symlink".to_string(),
        tar::EntryType::Link => "hardlink".to_string(),
        tar::EntryType::Char => "character device".to_string(),
        tar::EntryType::Block => "block device".to_string(),
        tar::EntryType::Fifo => "fifo".to_string(),
        tar::EntryType::XGlobalHeader => "pax global header".to_string(),
        other => format!("type {:?}", char::from(other.as_byte())),
    };
    EntryKind::Other { raw_type }
}
