//! Fetching artifact archives from an object store.

pub mod directory;
pub mod http;
pub mod resolver;
pub mod staging;
pub mod store;

pub use directory::DirectoryStore;
pub use http::DEFAULT_ENDPOINT;
pub use http::HttpObjectStore;
pub use resolver::FetchAttempt;
pub use resolver::FormatResolver;
pub use resolver::StagedArchive;
pub use store::ObjectStore;
