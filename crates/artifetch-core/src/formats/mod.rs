//! Archive format readers.

pub mod detect;
pub mod reader;
pub mod tar;
pub mod traits;
pub mod zip;

pub use detect::ArchiveFormat;
pub use detect::detect_format;
pub use reader::ArchiveReader;
pub use traits::EntryReader;
