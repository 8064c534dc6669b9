//! Task registry with admission control.

use crate::error::{Error, Result, TaskError};
use crate::types::{Status, Task, TaskId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handle to a single registered task
///
/// Readers take the read lock for a consistent snapshot; every mutation is
/// one write-locked critical section, so no reader sees a half-updated task.
pub type TaskHandle = Arc<RwLock<Task>>;

/// Registry of tasks keyed by identifier
///
/// Cloning is cheap; all clones share the same map. Locks are always taken
/// map first, then task, never the other way round.
#[derive(Clone)]
pub struct TaskStore {
    tasks: Arc<RwLock<HashMap<TaskId, TaskHandle>>>,
    max_tasks: usize,
}

impl TaskStore {
    /// Create an empty registry admitting at most `max_tasks` tasks
    pub fn new(max_tasks: usize) -> Self {
        Self {
            tasks: Arc::new(RwLock::new(HashMap::new())),
            max_tasks,
        }
    }

    /// Register a new pending task
    ///
    /// The capacity check and the insertion happen under one write lock, so
    /// concurrent callers can never over-commit the last free slot.
    pub async fn create(&self) -> Result<(TaskId, TaskHandle)> {
        let mut tasks = self.tasks.write().await;
        if tasks.len() >= self.max_tasks {
            return Err(Error::CapacityExceeded {
                max: self.max_tasks,
            });
        }

        let id = TaskId::new();
        let handle = Arc::new(RwLock::new(Task::new(id)));
        tasks.insert(id, handle.clone());
        Ok((id, handle))
    }

    /// Look up a task
    pub async fn get(&self, id: TaskId) -> Result<TaskHandle> {
        self.tasks
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| TaskError::not_found(id).into())
    }

    /// Remove a task; removing an absent task is not an error
    pub async fn delete(&self, id: TaskId) {
        self.tasks.write().await.remove(&id);
    }

    /// Hand out a task's archive and remove the task in one step
    ///
    /// Of two racing callers at most one receives the archive, the other gets
    /// `NotFound`. A task that ended in Error will never have an archive, so
    /// it is removed as well and its admission slot freed; tasks still
    /// collecting or processing stay registered.
    pub async fn take_archive(&self, id: TaskId) -> Result<Vec<u8>> {
        let mut tasks = self.tasks.write().await;
        let handle = tasks.get(&id).cloned().ok_or_else(|| TaskError::not_found(id))?;

        let archive = {
            let task = handle.read().await;
            match &task.archive {
                Some(archive) if task.status.has_archive() => archive.clone(),
                _ => {
                    if task.status == Status::Error {
                        tasks.remove(&id);
                    }
                    return Err(TaskError::ArchiveUnavailable {
                        id,
                        state: task.status,
                    }
                    .into());
                }
            }
        };

        tasks.remove(&id);
        Ok(archive)
    }

    /// Number of currently registered tasks
    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    /// Whether no task is registered
    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }
}
