//! End-to-end pull tests against in-process object stores.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use artifetch_core::ArchiveFormat;
use artifetch_core::ArtifactError;
use artifetch_core::ExtractOptions;
use artifetch_core::FormatPreference;
use artifetch_core::PullConfig;
use artifetch_core::Result;
use artifetch_core::fetch::DirectoryStore;
use artifetch_core::fetch::ObjectStore;
use artifetch_core::pull;
use artifetch_core::test_utils::TarGzBuilder;
use artifetch_core::test_utils::ZipBuilder;
use artifetch_core::test_utils::write_fixture;
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

/// Wraps a store and records every key it is asked for.
struct CountingStore<S> {
    inner: S,
    requested: Mutex<Vec<String>>,
}

impl<S: ObjectStore> CountingStore<S> {
    fn new(inner: S) -> Self {
        Self {
            inner,
            requested: Mutex::new(Vec::new()),
        }
    }

    fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl<S: ObjectStore> ObjectStore for CountingStore<S> {
    fn fetch(&self, bucket: &str, key: &str, dest: &Path) -> Result<u64> {
        self.requested.lock().unwrap().push(key.to_string());
        self.inner.fetch(bucket, key, dest)
    }
}

/// Store that denies every request.
struct DenyingStore;

impl ObjectStore for DenyingStore {
    fn fetch(&self, _bucket: &str, key: &str, _dest: &Path) -> Result<u64> {
        Err(ArtifactError::AccessDenied {
            key: key.to_string(),
        })
    }
}

fn mirror_with(files: &[(&str, Vec<u8>)]) -> TempDir {
    let mirror = TempDir::new().unwrap();
    for (key, data) in files {
        write_fixture(mirror.path(), &format!("j-artifacts/{key}"), data);
    }
    mirror
}

#[test]
fn test_pull_tar_artifact() {
    let mirror = mirror_with(&[(
        "Hazelcast-EE/12/Hazelcast-EE-12.tar",
        TarGzBuilder::new()
            .add_directory("a/")
            .add_file("a/b.txt", b"hi")
            .build(),
    )]);
    let root = TempDir::new().unwrap();
    let config = PullConfig::with_root("Hazelcast-EE", 12, root.path()).unwrap();
    let store = CountingStore::new(DirectoryStore::new(mirror.path()));

    let report = pull(&config, &store, &ExtractOptions::default()).unwrap();

    let expected = root.path().join("j-artifacts/Hazelcast-EE/12");
    assert_eq!(report.destination, expected.canonicalize().unwrap());
    assert_eq!(report.format, ArchiveFormat::TarGz);
    assert_eq!(report.remote_key, "Hazelcast-EE/12/Hazelcast-EE-12.tar");
    assert_eq!(std::fs::read_to_string(expected.join("a/b.txt")).unwrap(), "hi");
    assert_eq!(store.requested().len(), 1);
    assert!(!config.staging_path(ArchiveFormat::TarGz).exists());
}

#[test]
fn test_pull_falls_back_to_zip_exactly_once() {
    let mirror = mirror_with(&[(
        "repo/3/repo-3.zip",
        ZipBuilder::new().add_file("from-zip.txt", b"zip").build(),
    )]);
    let root = TempDir::new().unwrap();
    let config = PullConfig::with_root("repo", 3, root.path()).unwrap();
    let store = CountingStore::new(DirectoryStore::new(mirror.path()));

    let report = pull(&config, &store, &ExtractOptions::default()).unwrap();

    assert_eq!(report.format, ArchiveFormat::Zip);
    assert_eq!(report.attempts, 2);
    assert_eq!(
        store.requested(),
        vec!["repo/3/repo-3.tar", "repo/3/repo-3.zip"]
    );
    assert!(config.destination_dir().join("from-zip.txt").exists());
    assert!(!config.staging_path(ArchiveFormat::Zip).exists());
}

#[test]
fn test_pull_access_denied_is_not_retried() {
    let root = TempDir::new().unwrap();
    let config = PullConfig::with_root("repo", 3, root.path()).unwrap();
    let store = CountingStore::new(DenyingStore);

    let err = pull(&config, &store, &ExtractOptions::default()).unwrap_err();

    assert!(matches!(err, ArtifactError::AccessDenied { .. }));
    assert_eq!(store.requested(), vec!["repo/3/repo-3.tar"]);
}

#[test]
fn test_pull_missing_job() {
    let mirror = mirror_with(&[]);
    let root = TempDir::new().unwrap();
    let config = PullConfig::with_root("repo", 404, root.path()).unwrap();
    let store = CountingStore::new(DirectoryStore::new(mirror.path()));

    let err = pull(&config, &store, &ExtractOptions::default()).unwrap_err();

    assert!(matches!(err, ArtifactError::NoArchiveFound { job: 404, .. }));
    assert_eq!(store.requested().len(), 2);
    assert!(!config.staging_path(ArchiveFormat::TarGz).exists());
    assert!(!config.staging_path(ArchiveFormat::Zip).exists());
}

#[test]
fn test_pull_with_tar_preference_ignores_zip() {
    let mirror = mirror_with(&[(
        "repo/3/repo-3.zip",
        ZipBuilder::new().add_file("f", b"f").build(),
    )]);
    let root = TempDir::new().unwrap();
    let config = PullConfig::with_root("repo", 3, root.path())
        .unwrap()
        .with_preference(FormatPreference::Tar);
    let store = CountingStore::new(DirectoryStore::new(mirror.path()));

    let err = pull(&config, &store, &ExtractOptions::default()).unwrap_err();

    assert!(matches!(err, ArtifactError::NoArchiveFound { .. }));
    assert_eq!(store.requested(), vec!["repo/3/repo-3.tar"]);
}

#[test]
fn test_pull_custom_bucket() {
    let mirror = TempDir::new().unwrap();
    write_fixture(
        mirror.path(),
        "nightly/repo/1/repo-1.tar",
        &TarGzBuilder::new().add_file("n.txt", b"n").build(),
    );
    let root = TempDir::new().unwrap();
    let config = PullConfig::with_root("repo", 1, root.path())
        .unwrap()
        .with_bucket("nightly")
        .unwrap();

    pull(&config, &DirectoryStore::new(mirror.path()), &ExtractOptions::default()).unwrap();
    assert!(root.path().join("nightly/repo/1/n.txt").exists());
}

#[test]
fn test_pull_corrupt_artifact_keeps_staging_file() {
    let mirror = mirror_with(&[("repo/8/repo-8.tar", b"not a gzip stream".to_vec())]);
    let root = TempDir::new().unwrap();
    let config = PullConfig::with_root("repo", 8, root.path()).unwrap();

    let err = pull(&config, &DirectoryStore::new(mirror.path()), &ExtractOptions::default())
        .unwrap_err();

    assert!(err.is_decode_error());
    assert!(config.staging_path(ArchiveFormat::TarGz).exists());
}
