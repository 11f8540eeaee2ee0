//! Writing materialized entries to disk.
//!
//! - [`write_file`]: buffered file write with explicit flush and permissions
//! - [`create_directory`]: idempotent directory creation

use std::fs::File;
use std::fs::create_dir_all;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use crate::ArtifactError;
use crate::Result;
use crate::copy::CopyBuffer;
use crate::copy::copy_with_buffer;

/// Capacity of the output file writer.
const WRITE_BUFFER_SIZE: usize = 64 * 1024;

/// Writes one regular file entry to `target`.
///
/// Missing ancestors are created first, since tar streams may list a file
/// before its directory. An existing file is truncated. When `mode` is set
/// it is applied after the content has been flushed.
///
/// Returns the number of content bytes written.
///
/// # Errors
///
/// - `CorruptEntry` if reading the entry content fails
/// - `WriteFailed` if creating, writing, flushing or chmod-ing fails
/// - `ReleaseFailed` if the copy failed and the final flush failed as well
pub fn write_file(
    content: &mut dyn Read,
    entry_name: &str,
    target: &Path,
    mode: Option<u32>,
    buffer: &mut CopyBuffer,
) -> Result<u64> {
    if let Some(parent) = target.parent() {
        create_dir_all(parent).map_err(|source| ArtifactError::WriteFailed {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let output_file = File::create(target).map_err(|source| ArtifactError::WriteFailed {
        path: target.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, output_file);
    let bytes_written = stream_to(content, &mut writer, entry_name, target, buffer)?;
    drop(writer);

    #[cfg(unix)]
    if let Some(mode) = mode {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(target, std::fs::Permissions::from_mode(mode)).map_err(
            |source| ArtifactError::WriteFailed {
                path: target.to_path_buf(),
                source,
            },
        )?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    Ok(bytes_written)
}

/// Copies `content` into `writer` and flushes it.
///
/// The flush runs even when the copy failed; a flush error then rides along
/// the copy error as a `ReleaseFailed`.
fn stream_to<W: Write>(
    content: &mut dyn Read,
    writer: &mut W,
    entry_name: &str,
    target: &Path,
    buffer: &mut CopyBuffer,
) -> Result<u64> {
    let copied = copy_with_buffer(content, writer, buffer)
        .map_err(|e| e.into_entry_error(entry_name, target));
    let flushed = writer.flush();

    match (copied, flushed) {
        (Ok(bytes), Ok(())) => Ok(bytes),
        (Ok(_), Err(source)) => Err(ArtifactError::WriteFailed {
            path: target.to_path_buf(),
            source,
        }),
        (Err(primary), Ok(())) => Err(primary),
        (Err(primary), Err(release)) => Err(primary.with_release_error(release)),
    }
}

/// Creates a directory and all missing ancestors.
///
/// An existing directory is not an error.
///
/// # Errors
///
/// Returns `WriteFailed` if the directory cannot be created, including when
/// a regular file occupies the path.
pub fn create_directory(target: &Path) -> Result<()> {
    create_dir_all(target).map_err(|source| ArtifactError::WriteFailed {
        path: target.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::io::Error;
    use std::io::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_write_file_creates_ancestors() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("a").join("b").join("c.txt");
        let mut buffer = CopyBuffer::new();

        let written = write_file(
            &mut Cursor::new(b"hello".to_vec()),
            "a/b/c.txt",
            &target,
            None,
            &mut buffer,
        )
        .unwrap();

        assert_eq!(written, 5);
        assert_eq!(std::fs::read(&target).unwrap(), b"hello");
    }

    #[test]
    fn test_write_file_truncates_existing() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("f.txt");
        std::fs::write(&target, "a much longer previous content").unwrap();
        let mut buffer = CopyBuffer::new();

        write_file(&mut Cursor::new(b"new".to_vec()), "f.txt", &target, None, &mut buffer)
            .unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new");
    }

    #[test]
    #[cfg(unix)]
    fn test_write_file_applies_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let target = temp.path().join("run.sh");
        let mut buffer = CopyBuffer::new();

        write_file(
            &mut Cursor::new(b"#!/bin/sh\n".to_vec()),
            "run.sh",
            &target,
            Some(0o750),
            &mut buffer,
        )
        .unwrap();

        let mode = std::fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o750);
    }

    #[test]
    fn test_corrupt_content_is_corrupt_entry() {
        struct Truncated;

        impl Read for Truncated {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(Error::new(ErrorKind::UnexpectedEof, "unexpected end of stream"))
            }
        }

        let temp = TempDir::new().unwrap();
        let target = temp.path().join("f.bin");
        let mut buffer = CopyBuffer::new();

        let err = write_file(&mut Truncated, "f.bin", &target, None, &mut buffer).unwrap_err();
        assert!(matches!(err, ArtifactError::CorruptEntry { .. }));
    }

    /// Accepts writes, refuses to flush.
    struct StuckSink;

    impl Write for StuckSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(Error::other("device full"))
        }
    }

    /// Yields `data` once, then fails.
    struct CutShort<'a> {
        data: Option<&'a [u8]>,
    }

    impl Read for CutShort<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            match self.data.take() {
                Some(data) => {
                    buf[..data.len()].copy_from_slice(data);
                    Ok(data.len())
                }
                None => Err(Error::new(ErrorKind::InvalidData, "bad deflate block")),
            }
        }
    }

    #[test]
    fn test_flush_failure_after_corrupt_content_keeps_both_errors() {
        let mut content = CutShort {
            data: Some(b"partial"),
        };
        let mut buffer = CopyBuffer::new();

        let err = stream_to(
            &mut content,
            &mut StuckSink,
            "lib/a.so",
            Path::new("/out/lib/a.so"),
            &mut buffer,
        )
        .unwrap_err();

        let ArtifactError::ReleaseFailed { primary, release } = &err else {
            panic!("expected ReleaseFailed, got {err:?}");
        };
        assert!(matches!(**primary, ArtifactError::CorruptEntry { .. }));
        assert_eq!(release.to_string(), "device full");
        assert!(err.is_decode_error());
        assert_eq!(err.entry_path(), Some(Path::new("lib/a.so")));
    }

    #[test]
    fn test_flush_failure_after_clean_copy_is_write_failed() {
        let mut buffer = CopyBuffer::new();

        let err = stream_to(
            &mut Cursor::new(b"whole".to_vec()),
            &mut StuckSink,
            "a.txt",
            Path::new("/out/a.txt"),
            &mut buffer,
        )
        .unwrap_err();

        match err {
            ArtifactError::WriteFailed { path, .. } => assert_eq!(path, Path::new("/out/a.txt")),
            other => panic!("expected WriteFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_write_over_directory_fails() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("occupied");
        std::fs::create_dir(&target).unwrap();
        let mut buffer = CopyBuffer::new();

        let err = write_file(&mut Cursor::new(b"x".to_vec()), "occupied", &target, None, &mut buffer)
            .unwrap_err();
        assert!(matches!(err, ArtifactError::WriteFailed { .. }));
    }

    #[test]
    fn test_create_directory_idempotent() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("a").join("b");
        create_directory(&dir).unwrap();
        create_directory(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_create_directory_over_file_fails() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a");
        std::fs::write(&file, "x").unwrap();

        let err = create_directory(&file).unwrap_err();
        assert!(matches!(err, ArtifactError::WriteFailed { .. }));
    }
}
