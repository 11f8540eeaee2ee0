//! Archive listing implementation.

use std::path::Path;

use crate::Result;
use crate::formats::ArchiveFormat;
use crate::formats::ArchiveReader;
use crate::formats::detect_format;
use crate::inspection::manifest::ArchiveManifest;
use crate::inspection::manifest::ManifestEntry;

/// Lists archive contents without extracting.
///
/// When `format` is `None` it is detected from the file name. Entry content
/// is never read, so nothing is written to disk.
///
/// # Errors
///
/// Returns an error if the archive cannot be opened, its format cannot be
/// detected, or its container is corrupt.
///
/// # Examples
///
/// ```no_run
/// use artifetch_core::list_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let manifest = list_archive("128.tar", None)?;
///
/// println!("Archive contains {} entries", manifest.total_entries);
/// for entry in manifest.entries {
///     println!("{}: {} bytes", entry.name, entry.size);
/// }
/// # Ok(())
/// # }
/// ```
pub fn list_archive<P: AsRef<Path>>(
    archive_path: P,
    format: Option<ArchiveFormat>,
) -> Result<ArchiveManifest> {
    let archive_path = archive_path.as_ref();
    let format = match format {
        Some(format) => format,
        None => detect_format(archive_path)?,
    };

    let mut manifest = ArchiveManifest::new(format);
    ArchiveReader::open(archive_path, format)?.for_each_entry(|entry| {
        manifest.add_entry(ManifestEntry {
            name: entry.name,
            kind: entry.kind,
            mode: entry.mode,
            size: entry.size,
        });
        Ok(())
    })?;

    Ok(manifest)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ArtifactError;
    use crate::test_utils::TarGzBuilder;
    use crate::test_utils::ZipBuilder;
    use crate::test_utils::write_fixture;
    use crate::types::EntryKind;
    use tempfile::TempDir;

    #[test]
    fn test_list_tar_gz() {
        let temp = TempDir::new().unwrap();
        let path = write_fixture(
            temp.path(),
            "12.tar",
            &TarGzBuilder::new()
                .add_directory("a/")
                .add_file("a/b.txt", b"hi")
                .add_symlink("a/link", "b.txt")
                .build(),
        );

        let manifest = list_archive(&path, None).unwrap();

        assert_eq!(manifest.format, ArchiveFormat::TarGz);
        assert_eq!(manifest.total_entries, 3);
        assert_eq!(manifest.total_size, 2);
        assert_eq!(manifest.entries[1].name, "a/b.txt");
        assert_eq!(manifest.entries[1].kind, EntryKind::RegularFile);
        assert_eq!(manifest.unsupported_entries(), 1);
    }

    #[test]
    fn test_list_zip_with_explicit_format() {
        let temp = TempDir::new().unwrap();
        let path = write_fixture(
            temp.path(),
            "artifact.bin",
            &ZipBuilder::new().add_file("x.txt", b"xyz").build(),
        );

        let manifest = list_archive(&path, Some(ArchiveFormat::Zip)).unwrap();
        assert_eq!(manifest.total_entries, 1);
        assert_eq!(manifest.entries[0].mode, 0o644);
    }

    #[test]
    fn test_list_traversal_names_without_writing() {
        let temp = TempDir::new().unwrap();
        let path = write_fixture(
            temp.path(),
            "evil.zip",
            &ZipBuilder::new().add_file("../evil.txt", b"x").build(),
        );

        let manifest = list_archive(&path, None).unwrap();
        assert_eq!(manifest.entries[0].name, "../evil.txt");
        assert!(!temp.path().parent().unwrap().join("evil.txt").exists());
    }

    #[test]
    fn test_list_unknown_extension() {
        let temp = TempDir::new().unwrap();
        let path = write_fixture(temp.path(), "artifact.rar", b"");
        assert!(matches!(
            list_archive(&path, None),
            Err(ArtifactError::UnsupportedFormat)
        ));
    }
}
