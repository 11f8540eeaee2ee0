//! Materializing decoded entries on disk.

pub mod cancel;
pub mod materializer;
pub mod write;

pub use cancel::CancellationToken;
pub use materializer::Materializer;
