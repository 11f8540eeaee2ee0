//! Object store abstraction.

use std::path::Path;

use crate::Result;

/// Source of remote artifact objects.
///
/// Implementations download one object into a local file. The failure kind
/// matters to callers: only `ArtifactError::NotFound` lets the resolver try
/// another archive format.
///
/// # Errors contract
///
/// - `NotFound` when the key does not exist
/// - `AccessDenied` when the store refuses the request
/// - `Transport` for connection failures and unexpected replies
/// - `WriteFailed` when the local file cannot be written
///
/// A failed fetch must not leave a file at `dest`.
pub trait ObjectStore {
    /// Downloads `bucket/key` into `dest` and returns the number of bytes.
    ///
    /// # Errors
    ///
    /// See the trait documentation.
    fn fetch(&self, bucket: &str, key: &str, dest: &Path) -> Result<u64>;
}

impl<T: ObjectStore + ?Sized> ObjectStore for &T {
    fn fetch(&self, bucket: &str, key: &str, dest: &Path) -> Result<u64> {
        (**self).fetch(bucket, key, dest)
    }
}

impl<T: ObjectStore + ?Sized> ObjectStore for Box<T> {
    fn fetch(&self, bucket: &str, key: &str, dest: &Path) -> Result<u64> {
        (**self).fetch(bucket, key, dest)
    }
}
