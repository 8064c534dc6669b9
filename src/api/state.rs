//! Application state for the API server

use crate::Bundler;
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request (cheap Arc clone).
#[derive(Clone)]
pub struct AppState {
    /// The task lifecycle engine
    pub bundler: Arc<Bundler>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(bundler: Arc<Bundler>) -> Self {
        Self { bundler }
    }
}
