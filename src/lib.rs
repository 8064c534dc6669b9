//! # link-bundler
//!
//! Collects links into short-lived tasks, fetches them concurrently once a
//! task is full, and hands the results out as a single ZIP archive.
//!
//! ## Lifecycle
//!
//! 1. A client creates a task (bounded by `max_tasks` live tasks).
//! 2. It offers links; only allow-listed extensions are kept, up to `max_links`.
//! 3. The call that fills the task fetches every link in parallel and packs
//!    the successful ones into an in-memory archive.
//! 4. The archive is downloaded exactly once, which removes the task.
//!
//! ## Quick Start
//!
//! ```no_run
//! use link_bundler::{Bundler, Config, Status};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bundler = Bundler::new(Config::default())?;
//!
//!     let task = bundler.create_task().await?;
//!     let links = vec![
//!         "https://example.com/a.png".to_string(),
//!         "https://example.com/b.pdf".to_string(),
//!         "https://example.com/c.jpg".to_string(),
//!     ];
//!
//!     if bundler.add_links(task.id, &links).await? != Status::Pending {
//!         let archive = bundler.take_archive(task.id).await?;
//!         std::fs::write(format!("{}.zip", task.id), archive)?;
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Task lifecycle engine (decomposed into focused submodules)
pub mod bundler;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Core types
pub mod types;

// Re-export commonly used types
pub use bundler::Bundler;
pub use bundler::fetch::{Fetcher, HttpFetcher};
pub use config::Config;
pub use error::{
    ApiError, ArchiveError, Error, ErrorDetail, FetchError, Result, TaskError, ToHttpStatus,
};
pub use types::{Status, StatusReport, TaskCreated, TaskId};

/// Resolves when the process is asked to stop.
///
/// - **Unix:** SIGTERM or SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// Pass it to [`api::start_api_server`] for graceful shutdown.
pub async fn shutdown_signal() {
    wait_for_signal().await;
    tracing::info!("Shutdown signal received, draining in-flight requests");
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Registration may fail in restricted environments (containers, tests)
    match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Ok(mut sigterm), Err(e)) => {
            tracing::warn!(
                error = %e,
                "Could not register SIGINT handler, waiting for SIGTERM only"
            );
            sigterm.recv().await;
            tracing::info!("Received SIGTERM signal");
        }
        (Err(e), Ok(mut sigint)) => {
            tracing::warn!(
                error = %e,
                "Could not register SIGTERM handler, waiting for SIGINT only"
            );
            sigint.recv().await;
            tracing::info!("Received SIGINT signal (Ctrl+C)");
        }
        (Err(e), Err(_)) => {
            tracing::error!(
                error = %e,
                "Could not register any signal handlers, using ctrl_c fallback"
            );
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
