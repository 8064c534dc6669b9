//! Shared test helpers for creating Bundler instances in tests.

use crate::bundler::Bundler;
use crate::bundler::fetch::Fetcher;
use crate::config::Config;
use crate::error::FetchError;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Config with the given link quota, task limit and allow-list
pub(crate) fn test_config(max_links: usize, max_tasks: usize, exts: &[&str]) -> Config {
    let mut config = Config::default();
    config.tasks.max_links = max_links;
    config.tasks.max_tasks = max_tasks;
    config.tasks.allowed_extensions = exts.iter().map(|e| e.to_string()).collect();
    config.tasks.fetch_timeout = Duration::from_secs(2);
    config
}

/// Bundler fetching over real HTTP (pair with a wiremock server)
pub(crate) fn create_http_bundler(max_links: usize, max_tasks: usize, exts: &[&str]) -> Bundler {
    Bundler::new(test_config(max_links, max_tasks, exts)).unwrap()
}

/// In-memory [`Fetcher`] answering from a fixed table
///
/// Links not in the table fail with status 404. Counts every call.
#[derive(Default)]
pub(crate) struct StubFetcher {
    bodies: HashMap<String, Vec<u8>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StubFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `link`
    pub(crate) fn serve(mut self, link: &str, body: &[u8]) -> Self {
        self.bodies.insert(link.to_string(), body.to_vec());
        self
    }

    /// Sleep before answering every request
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, link: &str) -> Result<Vec<u8>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.bodies
            .get(link)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                link: link.to_string(),
                status: 404,
            })
    }
}

/// Bundler backed by a [`StubFetcher`]; returns the stub for call inspection
pub(crate) fn create_stub_bundler(
    config: Config,
    fetcher: StubFetcher,
) -> (Bundler, Arc<StubFetcher>) {
    let fetcher = Arc::new(fetcher);
    let bundler = Bundler::with_fetcher(config, fetcher.clone());
    (bundler, fetcher)
}

/// Names and contents of every entry in a ZIP archive, in archive order
pub(crate) fn archive_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    use std::io::Read;

    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut data = Vec::new();
            file.read_to_end(&mut data).unwrap();
            (file.name().to_string(), data)
        })
        .collect()
}

/// Convert string literals into owned links
pub(crate) fn links(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
