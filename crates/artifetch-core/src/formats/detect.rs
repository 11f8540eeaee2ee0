//! Archive format tags and detection.

use std::fmt;
use std::path::Path;

use crate::ArtifactError;
use crate::Result;

/// Container formats artifacts are published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    /// Gzip-compressed tar archive.
    TarGz,
    /// ZIP archive.
    Zip,
}

impl ArchiveFormat {
    /// File extension used for the remote object and the staging file.
    ///
    /// The tar+gzip artifact is published with a bare `.tar` extension even
    /// though its content is gzip-compressed.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::TarGz => "tar",
            Self::Zip => "zip",
        }
    }

    /// Human-readable format name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TarGz => "tar.gz",
            Self::Zip => "zip",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Detects the archive format of a local file from its name.
///
/// `.tar` is treated as tar+gzip because that is how staged artifacts are
/// named.
///
/// # Errors
///
/// Returns `UnsupportedFormat` if the extension is not recognized.
///
/// # Examples
///
/// ```
/// use artifetch_core::formats::ArchiveFormat;
/// use artifetch_core::formats::detect_format;
/// use std::path::Path;
///
/// assert_eq!(detect_format(Path::new("128.tar")).unwrap(), ArchiveFormat::TarGz);
/// assert_eq!(detect_format(Path::new("build.zip")).unwrap(), ArchiveFormat::Zip);
/// assert!(detect_format(Path::new("build.rar")).is_err());
/// ```
pub fn detect_format(path: &Path) -> Result<ArchiveFormat> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or(ArtifactError::UnsupportedFormat)?;

    match extension.to_ascii_lowercase().as_str() {
        "tar" | "gz" | "tgz" => Ok(ArchiveFormat::TarGz),
        "zip" => Ok(ArchiveFormat::Zip),
        _ => Err(ArtifactError::UnsupportedFormat),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_detect_staged_tar() {
        let path = PathBuf::from("128.tar");
        assert_eq!(detect_format(&path).unwrap(), ArchiveFormat::TarGz);
    }

    #[test]
    fn test_detect_tar_gz() {
        assert_eq!(
            detect_format(Path::new("archive.tar.gz")).unwrap(),
            ArchiveFormat::TarGz
        );
        assert_eq!(
            detect_format(Path::new("archive.tgz")).unwrap(),
            ArchiveFormat::TarGz
        );
    }

    #[test]
    fn test_detect_zip_case_insensitive() {
        assert_eq!(detect_format(Path::new("A.ZIP")).unwrap(), ArchiveFormat::Zip);
    }

    #[test]
    fn test_detect_unsupported() {
        for name in ["archive.7z", "archive.tar.xz", "no_extension"] {
            assert!(matches!(
                detect_format(Path::new(name)),
                Err(ArtifactError::UnsupportedFormat)
            ));
        }
    }

    #[test]
    fn test_extensions_and_names() {
        assert_eq!(ArchiveFormat::TarGz.extension(), "tar");
        assert_eq!(ArchiveFormat::Zip.extension(), "zip");
        assert_eq!(ArchiveFormat::TarGz.to_string(), "tar.gz");
    }
}
