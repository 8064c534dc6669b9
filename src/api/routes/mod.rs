//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`tasks`] - Task creation, link intake, status and archive download
//! - [`system`] - Health and OpenAPI

use serde::{Deserialize, Serialize};

mod system;
mod tasks;

// Re-export all handlers so `routes::function_name` works
pub use system::*;
pub use tasks::*;

// ============================================================================
// Request/Response Types (shared across handlers)
// ============================================================================

/// Request body for POST /tasks/:id/links
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AddLinksRequest {
    /// Candidate links; unsupported extensions and links beyond the quota are ignored
    pub links: Vec<String>,
}

/// Response for POST /tasks/:id/links
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AddLinksResponse {
    /// Pending while collecting links, otherwise the terminal status of the processing round
    pub status: crate::types::Status,
}
