//! Configuration for artifact pulls and extraction.

use std::path::Path;
use std::path::PathBuf;

use crate::ArtifactError;
use crate::Result;
use crate::extraction::CancellationToken;
use crate::formats::ArchiveFormat;

/// Bucket that PR-builder artifacts are uploaded to.
pub const DEFAULT_BUCKET: &str = "j-artifacts";

/// Which container formats the resolver may try, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatPreference {
    /// Try tar+gzip first, then fall back to zip on "not found".
    #[default]
    Auto,
    /// Only try the tar+gzip archive.
    Tar,
    /// Only try the zip archive.
    Zip,
}

impl FormatPreference {
    /// Returns the candidate formats in the order they are fetched.
    ///
    /// # Examples
    ///
    /// ```
    /// use artifetch_core::config::FormatPreference;
    /// use artifetch_core::formats::ArchiveFormat;
    ///
    /// assert_eq!(
    ///     FormatPreference::Auto.candidates(),
    ///     &[ArchiveFormat::TarGz, ArchiveFormat::Zip]
    /// );
    /// assert_eq!(FormatPreference::Zip.candidates(), &[ArchiveFormat::Zip]);
    /// ```
    #[must_use]
    pub const fn candidates(self) -> &'static [ArchiveFormat] {
        match self {
            Self::Auto => &[ArchiveFormat::TarGz, ArchiveFormat::Zip],
            Self::Tar => &[ArchiveFormat::TarGz],
            Self::Zip => &[ArchiveFormat::Zip],
        }
    }
}

/// Immutable description of one artifact pull.
///
/// Built once from the command line and passed by reference to the resolver
/// and the materializer. All derived paths and keys come from here.
///
/// # Examples
///
/// ```
/// use artifetch_core::PullConfig;
/// use artifetch_core::formats::ArchiveFormat;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = PullConfig::with_root("Hazelcast-EE-3.maintenance", 128, "/var/cache/artifacts")?;
///
/// assert_eq!(
///     config.remote_key(ArchiveFormat::TarGz),
///     "Hazelcast-EE-3.maintenance/128/Hazelcast-EE-3.maintenance-128.tar"
/// );
/// assert_eq!(
///     config.destination_dir(),
///     Path::new("/var/cache/artifacts/j-artifacts/Hazelcast-EE-3.maintenance/128")
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullConfig {
    repo: String,
    job_number: u64,
    bucket: String,
    output_root: PathBuf,
    preference: FormatPreference,
}

impl PullConfig {
    /// Creates a validated configuration rooted at the default output root.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the repository name is empty or contains
    /// path separators, if the job number is zero, or if no home directory
    /// can be determined.
    pub fn new(repo: impl Into<String>, job_number: u64) -> Result<Self> {
        Self::with_root(repo, job_number, default_output_root()?)
    }

    /// Creates a validated configuration with an explicit output root.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the repository name or job number is invalid.
    pub fn with_root(
        repo: impl Into<String>,
        job_number: u64,
        output_root: impl Into<PathBuf>,
    ) -> Result<Self> {
        let repo = repo.into();
        validate_component("repository name", &repo)?;
        if job_number < 1 {
            return Err(ArtifactError::InvalidConfig {
                reason: "job number must be at least 1".into(),
            });
        }

        Ok(Self {
            repo,
            job_number,
            bucket: DEFAULT_BUCKET.to_string(),
            output_root: output_root.into(),
            preference: FormatPreference::Auto,
        })
    }

    /// Sets the bucket the artifact is fetched from.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the bucket is empty or is not a single
    /// path component, since it names a local directory too.
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Result<Self> {
        let bucket = bucket.into();
        validate_component("bucket name", &bucket)?;
        self.bucket = bucket;
        Ok(self)
    }

    /// Sets the local directory under which artifacts are extracted.
    #[must_use]
    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    /// Sets which container formats the resolver may try.
    #[must_use]
    pub fn with_preference(mut self, preference: FormatPreference) -> Self {
        self.preference = preference;
        self
    }

    /// Repository (PR builder) name.
    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Job number.
    #[must_use]
    pub fn job_number(&self) -> u64 {
        self.job_number
    }

    /// Bucket name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Format preference.
    #[must_use]
    pub fn preference(&self) -> FormatPreference {
        self.preference
    }

    /// Root directory under which `<bucket>/<repo>/<job>` is created.
    #[must_use]
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Directory the archive is extracted into.
    #[must_use]
    pub fn destination_dir(&self) -> PathBuf {
        self.output_root
            .join(&self.bucket)
            .join(&self.repo)
            .join(self.job_number.to_string())
    }

    /// Object key of the archive in the given format.
    #[must_use]
    pub fn remote_key(&self, format: ArchiveFormat) -> String {
        format!(
            "{repo}/{job}/{repo}-{job}.{ext}",
            repo = self.repo,
            job = self.job_number,
            ext = format.extension()
        )
    }

    /// Local path the downloaded archive is staged at.
    ///
    /// The file is a hidden sibling of [`destination_dir`](Self::destination_dir),
    /// never inside it, so no archive entry can overwrite or collide with it.
    #[must_use]
    pub fn staging_path(&self, format: ArchiveFormat) -> PathBuf {
        self.output_root
            .join(&self.bucket)
            .join(&self.repo)
            .join(format!(".{}.{}", self.job_number, format.extension()))
    }
}

/// Checks that `value` is usable as one directory name under the output root.
fn validate_component(what: &str, value: &str) -> Result<()> {
    let problem = if value.trim().is_empty() {
        Some("must not be empty")
    } else if value.contains(['/', '\\', '\0']) {
        Some("must not contain path separators")
    } else if value == "." || value == ".." {
        Some("must not be a relative path component")
    } else {
        None
    };

    match problem {
        Some(problem) => Err(ArtifactError::InvalidConfig {
            reason: format!("{what} {problem}"),
        }),
        None => Ok(()),
    }
}

/// Returns the directory artifacts are extracted under by default.
///
/// On Linux `$XDG_CONFIG_HOME` wins when set; otherwise the user's home
/// directory is used.
///
/// # Errors
///
/// Returns `InvalidConfig` if no home directory can be determined.
pub fn default_output_root() -> Result<PathBuf> {
    #[cfg(target_os = "linux")]
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    dirs::home_dir().ok_or_else(|| ArtifactError::InvalidConfig {
        reason: "could not determine the home directory; pass an output root".into(),
    })
}

/// Options controlling how entries are written to disk.
///
/// # Examples
///
/// ```
/// use artifetch_core::ExtractOptions;
///
/// let options = ExtractOptions {
///     strip_special_bits: false,
///     ..Default::default()
/// };
/// assert!(options.preserve_permissions);
/// ```
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Apply the permission bits recorded in the archive to regular files.
    pub preserve_permissions: bool,

    /// Clear setuid, setgid and sticky bits before applying permissions.
    pub strip_special_bits: bool,

    /// Checked between entries; extraction aborts once it is cancelled.
    pub cancellation: Option<CancellationToken>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            preserve_permissions: true,
            strip_special_bits: true,
            cancellation: None,
        }
    }
}

impl ExtractOptions {
    /// Returns the mode to apply to a regular file, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use artifetch_core::ExtractOptions;
    ///
    /// let options = ExtractOptions::default();
    /// assert_eq!(options.effective_mode(0o4755), Some(0o755));
    /// assert_eq!(options.effective_mode(0o644), Some(0o644));
    /// ```
    #[must_use]
    pub fn effective_mode(&self, mode: u32) -> Option<u32> {
        if !self.preserve_permissions {
            return None;
        }
        if self.strip_special_bits {
            Some(mode & 0o777)
        } else {
            Some(mode & 0o7777)
        }
    }

    /// Returns `true` if the cancellation token has been triggered.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}
