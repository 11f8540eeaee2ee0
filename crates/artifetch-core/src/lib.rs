//! Fetch and safely unpack PR-builder artifact archives.
//!
//! `artifetch-core` downloads the archive a build published for a
//! repository and job number, then extracts it into a deterministic local
//! directory. Artifacts come as tar+gzip or zip; the tar object is tried
//! first and the zip object only when the tar one does not exist. Every
//! entry path is checked so nothing can be written outside the destination.
//!
//! # Examples
//!
//! ```no_run
//! use artifetch_core::ExtractOptions;
//! use artifetch_core::PullConfig;
//! use artifetch_core::fetch::HttpObjectStore;
//! use artifetch_core::pull;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PullConfig::new("Hazelcast-EE-3.maintenance", 128)?;
//! let report = pull(&config, &HttpObjectStore::new()?, &ExtractOptions::default())?;
//! println!("Extracted {} files", report.extraction.files_extracted);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod copy;
pub mod error;
pub mod extraction;
pub mod fetch;
pub mod formats;
pub mod inspection;
pub mod report;
pub mod test_utils;
pub mod types;

// Re-export main API types
pub use api::extract_archive;
pub use api::extract_archive_with_progress;
pub use api::pull;
pub use api::pull_with_progress;
pub use config::ExtractOptions;
pub use config::FormatPreference;
pub use config::PullConfig;
pub use error::ArtifactError;
pub use error::Result;
pub use extraction::CancellationToken;
pub use formats::ArchiveFormat;
pub use inspection::ArchiveManifest;
pub use inspection::ManifestEntry;
pub use inspection::list_archive;
pub use report::ExtractionReport;
pub use report::NoopProgress;
pub use report::ProgressCallback;
pub use report::PullReport;

// Re-export types module for easier access
pub use types::DestDir;
pub use types::EntryKind;
pub use types::SafePath;
