//! HTTP object store client.

use std::path::Path;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::Url;
use reqwest::blocking::Client;
use tracing::debug;

use crate::ArtifactError;
use crate::Result;

use super::ObjectStore;
use super::staging::write_staging_file;

/// Endpoint of the region the artifact bucket lives in.
pub const DEFAULT_ENDPOINT: &str = "https://s3.us-east-1.amazonaws.com";

const REQUEST_TIMEOUT_SECS: u64 = 600;
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// S3 error code returned in the body when a key does not exist.
const NO_SUCH_KEY: &str = "<Code>NoSuchKey</Code>";

/// Object store reached over plain HTTP(S) GET requests.
///
/// Objects are addressed path-style as `<endpoint>/<bucket>/<key>`. Requests
/// are anonymous; the bucket must allow public reads.
#[derive(Debug, Clone)]
pub struct HttpObjectStore {
    client: Client,
    endpoint: Url,
}

impl HttpObjectStore {
    /// Creates a client for [`DEFAULT_ENDPOINT`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Creates a client for a custom endpoint, such as a mirror or a local
    /// S3-compatible server.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the endpoint is not an absolute URL or the
    /// HTTP client cannot be built.
    pub fn with_endpoint(endpoint: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ArtifactError::InvalidConfig {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Self::with_client(client, endpoint)
    }

    /// Creates a store around an existing client.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the endpoint is not an absolute URL.
    pub fn with_client(client: Client, endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| ArtifactError::InvalidConfig {
            reason: format!("invalid endpoint {endpoint:?}: {e}"),
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(ArtifactError::InvalidConfig {
                reason: format!("endpoint {endpoint} cannot carry a path"),
            });
        }
        Ok(Self { client, endpoint })
    }

    /// Returns the URL an object is fetched from.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the endpoint cannot carry a path.
    pub fn object_url(&self, bucket: &str, key: &str) -> Result<Url> {
        let mut url = self.endpoint.clone();
        {
            let mut segments =
                url.path_segments_mut()
                    .map_err(|()| ArtifactError::InvalidConfig {
                        reason: format!("endpoint {} cannot carry a path", self.endpoint),
                    })?;
            segments.pop_if_empty();
            segments.push(bucket);
            segments.extend(key.split('/'));
        }
        Ok(url)
    }
}

impl ObjectStore for HttpObjectStore {
    fn fetch(&self, bucket: &str, key: &str, dest: &Path) -> Result<u64> {
        let url = self.object_url(bucket, key)?;
        debug!(%url, "requesting object");

        let mut response =
            self.client
                .get(url)
                .send()
                .map_err(|e| ArtifactError::Transport {
                    key: key.to_string(),
                    reason: e.to_string(),
                })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(classify_failure(key, status, &body));
        }

        write_staging_file(&mut response, dest, key)
    }
}

/// Maps an unsuccessful response to the matching error kind.
fn classify_failure(key: &str, status: StatusCode, body: &str) -> ArtifactError {
    if status == StatusCode::NOT_FOUND || body.contains(NO_SUCH_KEY) {
        return ArtifactError::NotFound {
            key: key.to_string(),
        };
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ArtifactError::AccessDenied {
            key: key.to_string(),
        },
        _ => ArtifactError::Transport {
            key: key.to_string(),
            reason: format!("HTTP {status}"),
        },
    }
}
