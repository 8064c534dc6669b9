//! Link intake and saturation-triggered processing.

use super::archive::{self, Finalized, ZipArchiveWriter};
use super::fetch;
use super::Bundler;
use crate::error::{Result, TaskError};
use crate::types::{Status, TaskId};
use tracing::{debug, error, info};

/// Extension of a link as the suffix of its last `/`-separated element,
/// starting at the final dot
///
/// Query strings are not stripped: `http://h/a.png?x=1` yields `.png?x=1`.
/// Returns an empty string when the last element has no dot.
pub fn link_extension(link: &str) -> &str {
    let base = link.rsplit('/').next().unwrap_or(link);
    match base.rfind('.') {
        Some(idx) => &base[idx..],
        None => "",
    }
}

/// Whether the link's extension is on the allow-list (stops at the first match)
fn is_allowed(link: &str, allowed: &[String]) -> bool {
    let ext = link_extension(link);
    !ext.is_empty() && allowed.iter().any(|a| a == ext)
}

impl Bundler {
    /// Offer candidate links to a pending task
    ///
    /// Candidates are taken in order while the task has room and their
    /// extension is allow-listed; everything else is dropped silently. When
    /// the task reaches its link quota, the whole fetch-and-archive round runs
    /// before this returns, and the terminal status is reported.
    pub async fn add_links(&self, id: TaskId, candidates: &[String]) -> Result<Status> {
        let handle = self.store.get(id).await?;
        let max_links = self.config.tasks.max_links;
        let allowed = &self.config.tasks.allowed_extensions;

        let links = {
            let mut task = handle.write().await;
            if task.status != Status::Pending {
                return Err(TaskError::InvalidState {
                    id,
                    operation: "add links to".to_string(),
                    current_state: task.status,
                }
                .into());
            }

            for candidate in candidates {
                if task.links.len() >= max_links {
                    debug!(task_id = %id, "link quota reached, ignoring remaining candidates");
                    break;
                }
                if is_allowed(candidate, allowed) {
                    task.links.push(candidate.clone());
                } else {
                    debug!(
                        task_id = %id,
                        link = %candidate,
                        "dropping link with unsupported extension"
                    );
                }
            }

            if task.links.len() < max_links {
                debug!(
                    task_id = %id,
                    links = task.links.len(),
                    max_links,
                    "task still collecting links"
                );
                return Ok(Status::Pending);
            }

            task.status = Status::Processing;
            task.links.clone()
        };

        Ok(self.process(id, &handle, links).await)
    }

    /// Fetch all links, build the archive and store the terminal result
    async fn process(
        &self,
        id: TaskId,
        handle: &super::store::TaskHandle,
        links: Vec<String>,
    ) -> Status {
        info!(task_id = %id, links = links.len(), "processing task");

        let outcomes = fetch::execute(self.fetcher.clone(), &links).await;

        let finalized = tokio::task::spawn_blocking(move || {
            archive::finalize(outcomes, Box::new(ZipArchiveWriter::new()))
        })
        .await
        .unwrap_or_else(|e| {
            error!(task_id = %id, error = %e, "archive builder did not finish");
            Finalized {
                status: Status::Error,
                log: Vec::new(),
                archive: None,
                entries: 0,
            }
        });

        let Finalized {
            status,
            log,
            archive,
            entries,
        } = finalized;
        let failures = log.len();

        {
            let mut task = handle.write().await;
            task.log.extend(log);
            task.archive = archive;
            task.status = status;
        }

        info!(
            task_id = %id,
            status = %status,
            entries,
            failures,
            "task finished"
        );
        status
    }
}
