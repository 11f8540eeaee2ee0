//! Zip archive reader.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use tracing::trace;
use zip::ZipArchive;

use crate::ArtifactError;
use crate::Result;
use crate::types::ArchiveEntry;
use crate::types::EntryKind;

use super::ArchiveFormat;
use super::EntryReader;

const S_IFMT: u32 = 0o170_000;
const S_IFLNK: u32 = 0o120_000;

/// Mode assumed for files that carry no unix permissions.
const DEFAULT_FILE_MODE: u32 = 0o644;

/// Mode assumed for directories that carry no unix permissions.
const DEFAULT_DIR_MODE: u32 = 0o755;

/// Reader for zip archives.
///
/// Entries are enumerated from the central directory in stored order. Names
/// are returned exactly as stored so that traversal attempts reach the path
/// sanitizer untouched.
pub struct ZipReader {
    archive: ZipArchive<BufReader<File>>,
    path: PathBuf,
}

impl ZipReader {
    /// Parses the central directory of an open archive file.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArchive` if the file is not a readable zip archive.
    pub fn new(file: File, path: &Path) -> Result<Self> {
        let archive =
            ZipArchive::new(BufReader::new(file)).map_err(|e| ArtifactError::InvalidArchive {
                archive: path.to_path_buf(),
                reason: format!("failed to open ZIP archive: {e}"),
            })?;

        Ok(Self {
            archive,
            path: path.to_path_buf(),
        })
    }

    /// Number of entries in the central directory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Returns `true` if the archive has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }
}

impl EntryReader for ZipReader {
    fn read_entries(
        &mut self,
        visit: &mut dyn FnMut(ArchiveEntry<'_>) -> Result<()>,
    ) -> Result<usize> {
        for index in 0..self.archive.len() {
            let mut file =
                self.archive
                    .by_index(index)
                    .map_err(|e| ArtifactError::InvalidArchive {
                        archive: self.path.clone(),
                        reason: format!("failed to read ZIP entry {index}: {e}"),
                    })?;

            let name = file.name().to_string();
            if name.is_empty() {
                return Err(ArtifactError::InvalidArchive {
                    archive: self.path.clone(),
                    reason: format!("entry {index} has an empty name"),
                });
            }

            let unix_mode = file.unix_mode();
            let kind = convert_zip_entry_type(file.is_dir(), unix_mode);
            let mode = entry_mode(&kind, unix_mode);
            let size = file.size();

            trace!(entry = %name, %kind, mode = format_args!("{mode:o}"), size, "decoded zip entry");

            let content: Option<&mut dyn Read> = if kind.is_file() {
                Some(&mut file)
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
        }

        Ok(self.archive.len())
    }

    fn format(&self) -> ArchiveFormat {
        ArchiveFormat::Zip
    }
}

impl std::fmt::Debug for ZipReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipReader")
            .field("path", &self.path)
            .field("entries", &self.archive.len())
            .finish()
    }
}

fn convert_zip_entry_type(is_dir: bool, unix_mode: Option<u32>) -> EntryKind {
    if is_dir {
        EntryKind::Directory
    } else if unix_mode.is_some_and(|mode| mode & S_IFMT == S_IFLNK) {
        EntryKind::Other {
            raw_type: "symlink".into(),
        }
    } else {
        EntryKind::RegularFile
    }
}

fn entry_mode(kind: &EntryKind, unix_mode: Option<u32>) -> u32 {
    let mode = unix_mode.unwrap_or(if kind.is_directory() {
        DEFAULT_DIR_MODE
    } else {
        DEFAULT_FILE_MODE
    });
    mode & 0o7777
}
