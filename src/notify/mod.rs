//! Status messages posted to the change-request discussion
//!
//! Each message becomes one closed thread, so it informs reviewers without
//! adding an open item to the review.

pub mod messages;

use crate::connection::Connection;
use crate::error::{ReleaseError, Result};
use crate::host::{CodeHost, ThreadHandle};

/// Posts threads on a single pull request
pub struct NotificationService<'a> {
    host: &'a dyn CodeHost,
    pull_request_id: i64,
}

impl<'a> NotificationService<'a> {
    pub fn new(host: &'a dyn CodeHost, pull_request_id: i64) -> Self {
        NotificationService {
            host,
            pull_request_id,
        }
    }

    pub fn for_connection(connection: &'a Connection) -> Self {
        Self::new(connection.host.as_ref(), connection.pull_request_id())
    }

    /// Post a thread and fail when the service rejects it.
    pub fn post_required(&self, message: &str) -> Result<ThreadHandle> {
        self.host
            .create_thread(self.pull_request_id, message)
            .map_err(|e| {
                ReleaseError::notification(format!(
                    "Could not post thread on pull request {}: {}",
                    self.pull_request_id, e
                ))
            })
    }

    /// Post a thread; a failure is logged and otherwise ignored.
    pub fn post(&self, message: &str) -> Option<ThreadHandle> {
        match self.post_required(message) {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        }
    }
}

/// Fenced code block.
pub fn code(text: &str, language: &str) -> String {
    format!("```{}\n{}\n```", language, text)
}

/// Inline code span.
pub fn one_line_code(text: &str) -> String {
    format!("`{}`", text)
}
