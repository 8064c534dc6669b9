//! Core types for link-bundler

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Unique identifier for a task
///
/// Allocated as a random UUID, so an identifier removed from the registry is
/// never handed out again.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct TaskId(pub Uuid);

impl TaskId {
    /// Allocate a fresh identifier
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID value
    pub fn get(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Task lifecycle status
///
/// Transitions only move forward: Created → Pending → Processing →
/// {Completed, Partial, Error}.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Status {
    /// Task was just allocated (only ever reported in the creation response)
    Created,
    /// Collecting links
    Pending,
    /// Fetching links and building the archive
    Processing,
    /// Every link was fetched and packaged
    Completed,
    /// Some links failed, the rest were packaged
    #[serde(rename = "Partially Completed")]
    Partial,
    /// Packaging failed, no archive is available
    Error,
}

impl Status {
    /// Whether processing has finished for this task
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Completed | Status::Partial | Status::Error)
    }

    /// Whether a task in this state holds a downloadable archive
    pub fn has_archive(&self) -> bool {
        matches!(self, Status::Completed | Status::Partial)
    }

    /// Human-readable name, identical to the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Created => "Created",
            Status::Pending => "Pending",
            Status::Processing => "Processing",
            Status::Completed => "Completed",
            Status::Partial => "Partially Completed",
            Status::Error => "Error",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A batch job tracking a set of links through fetch and packaging
#[derive(Debug, Clone)]
pub struct Task {
    /// Identifier the task is registered under
    pub id: TaskId,
    /// Accepted links, in the order they were added
    pub links: Vec<String>,
    /// Current lifecycle status
    pub status: Status,
    /// Failure messages, one per failed fetch
    pub log: Vec<String>,
    /// Finished ZIP archive, present only when status is Completed or Partial
    pub archive: Option<Vec<u8>>,
}

impl Task {
    /// Create an empty task waiting for links
    pub fn new(id: TaskId) -> Self {
        Self {
            id,
            links: Vec::new(),
            status: Status::Pending,
            log: Vec::new(),
            archive: None,
        }
    }

    /// Accumulated failure log as text, one message per line
    pub fn log_text(&self) -> String {
        self.log.join("\n")
    }
}

/// Response for task creation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskCreated {
    /// Identifier of the new task
    pub id: TaskId,
    /// Always `Created`
    pub status: Status,
}

/// Externally visible status of a task
///
/// `link` is present for Completed and Partial tasks, `log` only for Partial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusReport {
    /// Current lifecycle status
    pub status: Status,
    /// Accumulated fetch failure messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<String>,
    /// Where the archive can be downloaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}
