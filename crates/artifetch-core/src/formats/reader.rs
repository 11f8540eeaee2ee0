//! Format-independent archive reader.

use std::fs::File;
use std::path::Path;

use tracing::debug;

use crate::ArtifactError;
use crate::Result;
use crate::types::ArchiveEntry;

use super::ArchiveFormat;
use super::EntryReader;
use super::tar::TarGzReader;
use super::zip::ZipReader;

/// Reader over a staged archive of either supported format.
///
/// The archive file handle is owned by the reader and released when the
/// reader is dropped, which [`ArchiveReader::for_each_entry`] does on every
/// exit path.
///
/// # Examples
///
/// ```no_run
/// use artifetch_core::formats::ArchiveFormat;
/// use artifetch_core::formats::ArchiveReader;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let reader = ArchiveReader::open("128.tar", ArchiveFormat::TarGz)?;
/// let count = reader.for_each_entry(|entry| {
///     println!("{} ({})", entry.name, entry.kind);
///     Ok(())
/// })?;
/// println!("{count} entries");
/// # Ok(())
/// # }
/// ```
pub struct ArchiveReader {
    inner: Box<dyn EntryReader>,
}

impl ArchiveReader {
    /// Opens `path` as an archive of the given format.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be opened and `InvalidArchive` if a
    /// zip central directory cannot be parsed.
    pub fn open(path: impl AsRef<Path>, format: ArchiveFormat) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            ArtifactError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to open archive {}: {e}", path.display()),
            ))
        })?;

        debug!(archive = %path.display(), %format, "opening archive");

        let inner: Box<dyn EntryReader> = match format {
            ArchiveFormat::TarGz => Box::new(TarGzReader::new(file, path)),
            ArchiveFormat::Zip => Box::new(ZipReader::new(file, path)?),
        };

        Ok(Self { inner })
    }

    /// Walks every entry once and consumes the reader.
    ///
    /// # Errors
    ///
    /// Returns the first decode error or the first error returned by `visit`.
    pub fn for_each_entry<F>(mut self, mut visit: F) -> Result<usize>
    where
        F: FnMut(ArchiveEntry<'_>) -> Result<()>,
    {
        self.inner.read_entries(&mut visit)
    }
}

impl EntryReader for ArchiveReader {
    fn read_entries(
        &mut self,
        visit: &mut dyn FnMut(ArchiveEntry<'_>) -> Result<()>,
    ) -> Result<usize> {
        self.inner.read_entries(visit)
    }

    fn format(&self) -> ArchiveFormat {
        self.inner.format()
    }
}

impl std::fmt::Debug for ArchiveReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveReader")
            .field("format", &self.inner.format())
            .finish_non_exhaustive()
    }
}
