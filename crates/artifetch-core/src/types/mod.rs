//! Type-safe wrappers for archive extraction operations.
//!
//! The destination and entry path types enforce containment at the type
//! level: they are validated on construction and cannot be created from raw
//! paths without going through validation.
//!
//! # Design Principles
//!
//! - Invalid write targets cannot be represented
//! - No `From<RawType>` implementations for security types
//! - All constructors perform validation

pub mod dest_dir;
pub mod entry;
pub mod safe_path;

pub use dest_dir::DestDir;
pub use entry::ArchiveEntry;
pub use entry::EntryKind;
pub use safe_path::SafePath;
