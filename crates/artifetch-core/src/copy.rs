//! Buffered copy that tells read failures apart from write failures.
//!
//! Extraction needs the distinction: a failing read means the archive is
//! corrupt, a failing write means the local disk is. Downloads use the same
//! split to separate transport errors from staging-file errors.

use std::io::Read;
use std::io::Write;
use std::io::{self};
use std::path::Path;

use crate::ArtifactError;

/// Buffer size for I/O operations (64KB).
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Reusable buffer for copying entry content.
///
/// One buffer is shared by every entry of an extraction run so that copying
/// does not allocate per file.
///
/// # Examples
///
/// ```
/// use artifetch_core::copy::CopyBuffer;
/// use artifetch_core::copy::copy_with_buffer;
///
/// let mut buffer = CopyBuffer::new();
/// let mut sink = Vec::new();
///
/// let copied = copy_with_buffer(&mut &b"hi"[..], &mut sink, &mut buffer).unwrap();
/// assert_eq!(copied, 2);
/// assert_eq!(sink, b"hi");
/// ```
#[derive(Debug)]
pub struct CopyBuffer {
    buf: Box<[u8]>,
}

impl CopyBuffer {
    /// Creates a new zero-initialized copy buffer.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; COPY_BUFFER_SIZE].into_boxed_slice(),
        }
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Which side of a copy failed.
#[derive(Debug)]
pub enum CopyError {
    /// Reading from the source failed.
    Read(io::Error),
    /// Writing to the destination failed.
    Write(io::Error),
}

impl CopyError {
    /// Converts a failed entry copy into the matching extraction error.
    ///
    /// Read failures become `CorruptEntry`, write failures `WriteFailed`.
    #[must_use]
    pub fn into_entry_error(self, entry: &str, target: &Path) -> ArtifactError {
        match self {
            Self::Read(source) => ArtifactError::CorruptEntry {
                entry: entry.into(),
                source,
            },
            Self::Write(source) => ArtifactError::WriteFailed {
                path: target.to_path_buf(),
                source,
            },
        }
    }
}

impl std::fmt::Display for CopyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read(e) => write!(f, "read failed: {e}"),
            Self::Write(e) => write!(f, "write failed: {e}"),
        }
    }
}

impl std::error::Error for CopyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read(e) | Self::Write(e) => Some(e),
        }
    }
}

/// Copies data from reader to writer using the provided reusable buffer.
///
/// Interrupted reads are retried. Returns the total number of bytes copied.
///
/// # Errors
///
/// Returns `CopyError::Read` if reading from the source fails and
/// `CopyError::Write` if writing to the destination fails.
#[inline]
pub fn copy_with_buffer<R: Read + ?Sized, W: Write + ?Sized>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
) -> Result<u64, CopyError> {
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyError::Read(e)),
        };

        writer
            .write_all(&buffer.buf[..bytes_read])
            .map_err(CopyError::Write)?;

        total = total.saturating_add(bytes_read as u64);
    }

    Ok(total)
}
