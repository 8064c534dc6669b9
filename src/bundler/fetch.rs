//! Remote file fetching and the per-task fan-out/fan-in.

use crate::error::{Error, FetchError, Result};
use std::sync::Arc;
use std::time::Duration;

/// Abstraction over retrieving one remote resource, enabling testability.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the full body behind `link`
    async fn fetch(&self, link: &str) -> std::result::Result<Vec<u8>, FetchError>;
}

/// Production [`Fetcher`] backed by a shared reqwest client.
///
/// Every attempt is bounded by the client timeout, so one unresponsive host
/// cannot stall a whole task.
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Build a fetcher whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Network)?;
        Ok(Self { client, timeout })
    }
}

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, link: &str) -> std::result::Result<Vec<u8>, FetchError> {
        let response = self.client.get(link).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    link: link.to_string(),
                    timeout: self.timeout,
                }
            } else {
                FetchError::Request {
                    link: link.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(FetchError::Status {
                link: link.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    link: link.to_string(),
                    timeout: self.timeout,
                }
            } else {
                FetchError::Body {
                    link: link.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        Ok(body.to_vec())
    }
}

/// Result of one fetch attempt
#[derive(Debug)]
pub struct FetchOutcome {
    /// Index of the link in the task's link list
    pub position: usize,
    /// Retrieved file or the reason it could not be retrieved
    pub result: std::result::Result<FetchedFile, FetchError>,
}

/// A successfully retrieved file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFile {
    /// Name derived from the link, used as the archive entry name
    pub filename: String,
    /// File contents
    pub data: Vec<u8>,
}

/// Derive an archive entry name from a link
///
/// Uses the last path segment of the URL, percent-decoded. Links that do not
/// parse as URLs, or whose last segment is empty, keep the raw link text.
pub fn derive_filename(link: &str) -> String {
    let Ok(url) = url::Url::parse(link) else {
        return link.to_string();
    };

    let segment = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
        .unwrap_or("");

    if segment.is_empty() {
        return link.to_string();
    }

    urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

/// Fetch every link concurrently and wait for all attempts to finish
///
/// One worker is spawned per link. The join is a full barrier: earlier
/// failures never cancel the remaining attempts. Outcomes are returned in no
/// particular order; each carries the position of its link.
pub async fn execute(fetcher: Arc<dyn Fetcher>, links: &[String]) -> Vec<FetchOutcome> {
    let workers: Vec<_> = links
        .iter()
        .cloned()
        .map(|link| {
            let fetcher = fetcher.clone();
            tokio::spawn(async move {
                let data = fetcher.fetch(&link).await?;
                Ok::<_, FetchError>(FetchedFile {
                    filename: derive_filename(&link),
                    data,
                })
            })
        })
        .collect();

    let joined = futures::future::join_all(workers).await;

    joined
        .into_iter()
        .zip(links)
        .enumerate()
        .map(|(position, (joined, link))| {
            let result = match joined {
                Ok(result) => result,
                Err(e) => Err(FetchError::Worker {
                    link: link.clone(),
                    reason: e.to_string(),
                }),
            };
            match &result {
                Ok(file) => tracing::debug!(
                    link = %link,
                    filename = %file.filename,
                    bytes = file.data.len(),
                    "fetched link"
                ),
                Err(e) => tracing::warn!(link = %link, error = %e, "fetch failed"),
            }
            FetchOutcome { position, result }
        })
        .collect()
}
