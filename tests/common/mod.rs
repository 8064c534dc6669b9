//! Common test utilities for link-bundler integration tests

use link_bundler::Config;
use std::io::Read;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Config with short timeouts suitable for a local mock server
pub fn test_config(max_links: usize, max_tasks: usize) -> Config {
    let mut config = Config::default();
    config.tasks.max_links = max_links;
    config.tasks.max_tasks = max_tasks;
    config.tasks.fetch_timeout = Duration::from_secs(2);
    config
}

/// Serve `body` with status 200 at `route`
pub async fn serve_file(server: &MockServer, route: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

/// Serve `body` at `route` after `delay`
#[allow(dead_code)]
pub async fn serve_file_slowly(server: &MockServer, route: &str, body: &[u8], delay: Duration) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(body.to_vec())
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

/// Names and contents of every entry in a ZIP archive, in archive order
pub fn archive_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
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
