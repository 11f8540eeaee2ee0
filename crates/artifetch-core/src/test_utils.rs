//! Test utilities for building artifact archives.
//!
//! Archives are built in memory so each test states exactly which entries,
//! modes and names it feeds to the reader.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use flate2::Compression;
use flate2::write::GzEncoder;

/// Writes `data` to `dir/name` and returns the full path.
pub fn write_fixture(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, data).unwrap();
    path
}

/// Builder for gzip-compressed tar test archives.
///
/// # Examples
///
/// ```
/// use artifetch_core::test_utils::TarGzBuilder;
///
/// let data = TarGzBuilder::new()
///     .add_directory("a/")
///     .add_file("a/b.txt", b"hi")
///     .add_symlink("link", "a/b.txt")
///     .build();
/// assert!(!data.is_empty());
/// ```
pub struct TarGzBuilder {
    builder: tar::Builder<Vec<u8>>,
}

impl TarGzBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
        }
    }

    /// Adds a regular file with mode 0o644.
    #[must_use]
    pub fn add_file(self, path: &str, data: &[u8]) -> Self {
        self.add_file_with_mode(path, data, 0o644)
    }

    /// Adds a regular file with a custom mode.
    #[must_use]
    pub fn add_file_with_mode(mut self, path: &str, data: &[u8], mode: u32) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(mode);
        header.set_cksum();
        self.builder.append_data(&mut header, path, data).unwrap();
        self
    }

    /// Adds a directory with mode 0o755.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o755);
        header.set_entry_type(tar::EntryType::Directory);
        header.set_cksum();
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }

    /// Adds a symbolic link.
    #[must_use]
    pub fn add_symlink(mut self, path: &str, target: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o777);
        header.set_entry_type(tar::EntryType::Symlink);
        header.set_link_name(target).unwrap();
        header.set_cksum();
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }

    /// Adds a regular file whose name is written into the header verbatim.
    ///
    /// `tar::Header::set_path` refuses `..` components, so traversal names
    /// have to bypass it. The name must fit in 100 bytes.
    #[must_use]
    pub fn add_raw_name_file(mut self, name: &str, data: &[u8]) -> Self {
        let mut header = tar::Header::new_gnu();
        let bytes = name.as_bytes();
        assert!(bytes.len() < 100, "raw name too long");
        header.as_old_mut().name[..bytes.len()].copy_from_slice(bytes);
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        self.builder.append(&header, data).unwrap();
        self
    }

    /// Finishes the tar stream and gzips it.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let tar_data = self.builder.into_inner().unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&tar_data).unwrap();
        encoder.finish().unwrap()
    }
}

impl Default for TarGzBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for zip test archives.
///
/// Entry names are stored as given, including `..` segments.
///
/// # Examples
///
/// ```
/// use artifetch_core::test_utils::ZipBuilder;
///
/// let data = ZipBuilder::new()
///     .add_directory("a/")
///     .add_file("a/b.txt", b"hi")
///     .build();
/// assert!(!data.is_empty());
/// ```
pub struct ZipBuilder {
    zip: zip::ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            zip: zip::ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Adds a regular file with mode 0o644.
    #[must_use]
    pub fn add_file(self, path: &str, data: &[u8]) -> Self {
        self.add_file_with_mode(path, data, 0o644)
    }

    /// Adds a regular file with custom permission bits (`0o777` range).
    #[must_use]
    pub fn add_file_with_mode(mut self, path: &str, data: &[u8], mode: u32) -> Self {
        use zip::write::SimpleFileOptions;

        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .unix_permissions(mode);

        self.zip.start_file(path, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a directory with mode 0o755.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        use zip::write::SimpleFileOptions;

        let options = SimpleFileOptions::default().unix_permissions(0o755);
        self.zip.add_directory(path, options).unwrap();
        self
    }

    /// Adds a symbolic link.
    #[must_use]
    pub fn add_symlink(mut self, path: &str, target: &str) -> Self {
        use zip::write::SimpleFileOptions;

        self.zip
            .add_symlink(path, target, SimpleFileOptions::default())
            .unwrap();
        self
    }

    /// Finishes the archive and returns its bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.zip.finish().unwrap().into_inner()
    }
}

impl Default for ZipBuilder {
    fn default() -> Self {
        Self::new()
    }
}
