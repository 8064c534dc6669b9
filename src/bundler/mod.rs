//! Task lifecycle engine split into focused submodules.
//!
//! The `Bundler` struct and its methods are organized by stage:
//! - [`store`] - Task registry with admission control
//! - [`intake`] - Link validation and saturation-triggered processing
//! - [`fetch`] - Concurrent remote fetching
//! - [`archive`] - ZIP packaging and terminal status resolution
//! - [`status`] - External status projection

pub mod archive;
pub mod fetch;
mod intake;
pub mod status;
pub mod store;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use intake::link_extension;

use crate::config::Config;
use crate::error::Result;
use crate::types::{Status, StatusReport, TaskCreated, TaskId};
use fetch::{Fetcher, HttpFetcher};
use std::sync::Arc;
use store::TaskStore;

/// Main bundler instance (cloneable - all fields are Arc-wrapped)
#[derive(Clone)]
pub struct Bundler {
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Registry of all live tasks
    pub(crate) store: TaskStore,
    /// Fetcher used by every processing round
    pub(crate) fetcher: Arc<dyn Fetcher>,
}

impl Bundler {
    /// Create a bundler that fetches over HTTP with the configured timeout
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.tasks.fetch_timeout)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    /// Create a bundler with a custom [`Fetcher`]
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher>) -> Self {
        let store = TaskStore::new(config.tasks.max_tasks);
        Self {
            config: Arc::new(config),
            store,
            fetcher,
        }
    }

    /// Register a new task waiting for links
    pub async fn create_task(&self) -> Result<TaskCreated> {
        let (id, _) = self.store.create().await.inspect_err(|e| {
            tracing::warn!(error = %e, "task creation rejected");
        })?;
        tracing::info!(task_id = %id, "task created");

        Ok(TaskCreated {
            id,
            status: Status::Created,
        })
    }

    /// Current externally visible status of a task
    pub async fn status(&self, id: TaskId) -> Result<StatusReport> {
        let handle = self.store.get(id).await?;
        let task = handle.read().await;
        Ok(status::report(&self.config.service, &task))
    }

    /// Hand out a finished archive, removing the task from the registry
    pub async fn take_archive(&self, id: TaskId) -> Result<Vec<u8>> {
        let archive = self.store.take_archive(id).await?;
        tracing::info!(task_id = %id, bytes = archive.len(), "archive handed out, task removed");
        Ok(archive)
    }

    /// Number of currently registered tasks
    pub async fn task_count(&self) -> usize {
        self.store.len().await
    }
}
