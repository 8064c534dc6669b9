//! Error types for link-bundler
//!
//! This module provides error handling for the library, including:
//! - Request-level errors surfaced to API callers (capacity, lookup, state)
//! - Deferred per-link fetch errors and archive packaging errors
//! - HTTP status code mapping for API integration
//! - Structured error responses with machine-readable error codes

use crate::types::{Status, TaskId};
use std::time::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for link-bundler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for link-bundler
///
/// These are the failures reported synchronously to the caller of an
/// operation. Per-link fetch failures and archive failures never appear
/// here; they are folded into the task's log and terminal status.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "MAX_LINKS")
        key: Option<String>,
    },

    /// The registry already holds the maximum number of tasks
    #[error("maximum number of active tasks reached ({max})")]
    CapacityExceeded {
        /// Configured maximum number of concurrently registered tasks
        max: usize,
    },

    /// Task lookup or lifecycle error
    #[error(transparent)]
    Task(#[from] TaskError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),
}

/// Task lookup and lifecycle errors
#[derive(Debug, Error)]
pub enum TaskError {
    /// No task is registered under this identifier
    #[error("task {id} not found")]
    NotFound {
        /// The task ID that was not found
        id: String,
    },

    /// Cannot perform operation in the task's current state
    #[error("cannot {operation} task {id} in state {current_state}")]
    InvalidState {
        /// The task ID that is in an invalid state for the operation
        id: TaskId,
        /// The operation that was attempted (e.g., "add links to")
        operation: String,
        /// The state that prevents the operation
        current_state: Status,
    },

    /// The task has no archive to hand out (not finished, or finished with Error)
    #[error("task {id} has no archive available in state {state}")]
    ArchiveUnavailable {
        /// The task ID whose archive was requested
        id: TaskId,
        /// The task's current state
        state: Status,
    },
}

impl TaskError {
    /// Create a "not found" error for any identifier text
    pub fn not_found(id: impl ToString) -> Self {
        TaskError::NotFound { id: id.to_string() }
    }
}

/// Failure of a single fetch attempt
///
/// Never returned to API callers. The display text is what ends up in the
/// task log.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the connection failed
    #[error("failed to fetch {link}: {reason}")]
    Request {
        /// The link that was being fetched
        link: String,
        /// Underlying transport error text
        reason: String,
    },

    /// The remote answered with a non-OK status code
    #[error("failed to fetch {link}: code {status}")]
    Status {
        /// The link that was being fetched
        link: String,
        /// HTTP status code returned by the remote
        status: u16,
    },

    /// The attempt exceeded the per-attempt timeout
    #[error("failed to fetch {link}: timed out after {timeout:?}")]
    Timeout {
        /// The link that was being fetched
        link: String,
        /// Configured per-attempt timeout
        timeout: Duration,
    },

    /// The response body could not be read
    #[error("failed to read body of {link}: {reason}")]
    Body {
        /// The link that was being fetched
        link: String,
        /// Underlying error text
        reason: String,
    },

    /// The worker running the attempt panicked or was aborted
    #[error("fetch worker for {link} did not finish: {reason}")]
    Worker {
        /// The link that was being fetched
        link: String,
        /// Join error text
        reason: String,
    },
}

/// Failure while packaging fetched files into the archive
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Writing an archive entry failed
    #[error("failed to write archive entry {name}: {reason}")]
    Entry {
        /// Entry name being written
        name: String,
        /// Underlying error text
        reason: String,
    },

    /// Finalizing the archive failed
    #[error("failed to finish archive: {0}")]
    Finish(String),

    /// The entry name cannot be stored in the archive
    #[error("invalid archive entry name {0:?}")]
    InvalidEntryName(String),
}

/// API error response format
///
/// This structure is returned by API endpoints when an error occurs.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "task_not_found",
///     "message": "task 9b2c... not found",
///     "details": {
///       "task_id": "9b2c..."
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "task_not_found", "capacity_exceeded")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Error::Config { .. } => 400,

            // 404 Not Found
            Error::Task(TaskError::NotFound { .. }) => 404,

            // 409 Conflict - task is not in a state that allows the operation
            Error::Task(TaskError::InvalidState { .. }) => 409,
            Error::Task(TaskError::ArchiveUnavailable { .. }) => 409,

            // 500 Internal Server Error
            Error::Io(_) => 500,
            Error::ApiServerError(_) => 500,

            // 502 Bad Gateway - External service errors
            Error::Network(_) => 502,

            // 503 Service Unavailable
            Error::CapacityExceeded { .. } => 503,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::CapacityExceeded { .. } => "capacity_exceeded",
            Error::Task(e) => match e {
                TaskError::NotFound { .. } => "task_not_found",
                TaskError::InvalidState { .. } => "invalid_state",
                TaskError::ArchiveUnavailable { .. } => "archive_unavailable",
            },
            Error::Io(_) => "io_error",
            Error::Network(_) => "network_error",
            Error::ApiServerError(_) => "api_server_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::CapacityExceeded { max } => Some(serde_json::json!({
                "max_tasks": max,
            })),
            Error::Task(TaskError::NotFound { id }) => Some(serde_json::json!({
                "task_id": id,
            })),
            Error::Task(TaskError::InvalidState {
                id,
                operation,
                current_state,
            }) => Some(serde_json::json!({
                "task_id": id,
                "operation": operation,
                "current_state": current_state,
            })),
            Error::Task(TaskError::ArchiveUnavailable { id, state }) => Some(serde_json::json!({
                "task_id": id,
                "current_state": state,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
