//! Staging file handling.
//!
//! The staging file is the downloaded archive before extraction. It is
//! written under a `.part` name and renamed into place only once complete, and
//! removed again after a successful extraction.

use std::fs::File;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use crate::ArtifactError;
use crate::Result;
use crate::copy::CopyBuffer;
use crate::copy::CopyError;
use crate::copy::copy_with_buffer;

/// Returns the temporary path a download is written to before the rename.
#[must_use]
pub fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

/// Streams `source` into `dest` through a `.part` file.
///
/// On failure the partial file is removed and `dest` is left untouched.
///
/// # Errors
///
/// - `Transport` if reading `source` fails
/// - `WriteFailed` if the local file cannot be written or renamed
/// - `ReleaseFailed` if the partial file could not be removed after an error
pub fn write_staging_file(source: &mut dyn Read, dest: &Path, key: &str) -> Result<u64> {
    let part = part_path(dest);
    match stream_to(source, &part, key).and_then(|bytes| {
        std::fs::rename(&part, dest).map_err(|source| ArtifactError::WriteFailed {
            path: dest.to_path_buf(),
            source,
        })?;
        Ok(bytes)
    }) {
        Ok(bytes) => {
            debug!(path = %dest.display(), bytes, "staged archive");
            Ok(bytes)
        }
        Err(e) => Err(discard_partial(&part, e)),
    }
}

fn stream_to(source: &mut dyn Read, part: &Path, key: &str) -> Result<u64> {
    let file = File::create(part).map_err(|source| ArtifactError::WriteFailed {
        path: part.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    drain(source, &mut writer, part, key)
}

/// Copies a download into `writer` and flushes it, keeping a flush error that
/// follows a failed copy as the release error.
fn drain<W: Write>(source: &mut dyn Read, writer: &mut W, part: &Path, key: &str) -> Result<u64> {
    let mut buffer = CopyBuffer::new();

    let copied = copy_with_buffer(source, writer, &mut buffer).map_err(|e| match e {
        CopyError::Read(e) => ArtifactError::Transport {
            key: key.to_string(),
            reason: e.to_string(),
        },
        CopyError::Write(source) => ArtifactError::WriteFailed {
            path: part.to_path_buf(),
            source,
        },
    });
    let flushed = writer.flush();

    match (copied, flushed) {
        (Ok(bytes), Ok(())) => Ok(bytes),
        (Ok(_), Err(source)) => Err(ArtifactError::WriteFailed {
            path: part.to_path_buf(),
            source,
        }),
        (Err(primary), Ok(())) => Err(primary),
        (Err(primary), Err(release)) => Err(primary.with_release_error(release)),
    }
}

fn discard_partial(part: &Path, primary: ArtifactError) -> ArtifactError {
    match std::fs::remove_file(part) {
        Ok(()) => primary,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => primary,
        Err(release) => primary.with_release_error(release),
    }
}

/// Removes a staging file after a successful extraction.
///
/// Returns `Ok(true)` if the file was removed and `Ok(false)` if it did not
/// exist.
///
/// # Errors
///
/// Returns `Cleanup` for any failure other than the file being absent.
pub fn remove_staging_file(path: &Path) -> Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed staging file");
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(ArtifactError::Cleanup {
            path: path.to_path_buf(),
            source,
        }),
    }
}
