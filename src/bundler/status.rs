//! External status projection.

use crate::config::ServiceConfig;
use crate::types::{Status, StatusReport, Task};

/// Download location for a task's archive
pub fn download_locator(service: &ServiceConfig, task: &Task) -> String {
    format!("{}/tasks/{}/download", service.public_base(), task.id)
}

/// Project a task onto its external status payload
pub fn report(service: &ServiceConfig, task: &Task) -> StatusReport {
    match task.status {
        Status::Completed => StatusReport {
            status: task.status,
            log: None,
            link: Some(download_locator(service, task)),
        },
        Status::Partial => StatusReport {
            status: task.status,
            log: Some(task.log_text()),
            link: Some(download_locator(service, task)),
        },
        _ => StatusReport {
            status: task.status,
            log: None,
            link: None,
        },
    }
}
