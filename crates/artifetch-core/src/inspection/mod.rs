//! Archive inspection without extraction.
//!
//! # Examples
//!
//! ```no_run
//! use artifetch_core::list_archive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manifest = list_archive("128.tar", None)?;
//! println!("Archive contains {} entries", manifest.total_entries);
//! # Ok(())
//! # }
//! ```

pub mod list;
pub mod manifest;

pub use list::list_archive;
pub use manifest::ArchiveManifest;
pub use manifest::ManifestEntry;
