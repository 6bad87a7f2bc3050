use std::fmt;

use crate::domain::pull_request::{IdentityRef, PullRequest};

/// Immutable snapshot of the change request a pipeline run works on.
///
/// Built once by the connection provider; later steps derive values from it
/// but never write back.
#[derive(Clone, PartialEq, Eq)]
pub struct ReleaseContext {
    pub repository_id: String,
    pub access_token: String,
    pub pull_request_id: i64,
    pub title: String,
    pub source_ref: String,
    pub target_ref: String,
    pub author: IdentityRef,
}

impl ReleaseContext {
    pub fn from_pull_request(
        repository_id: impl Into<String>,
        access_token: impl Into<String>,
        pull_request: &PullRequest,
    ) -> Self {
        ReleaseContext {
            repository_id: repository_id.into(),
            access_token: access_token.into(),
            pull_request_id: pull_request.pull_request_id,
            title: pull_request.title.clone(),
            source_ref: pull_request.source_ref_name.clone(),
            target_ref: pull_request.target_ref_name.clone(),
            author: pull_request.created_by.clone(),
        }
    }
}

impl fmt::Debug for ReleaseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseContext")
            .field("repository_id", &self.repository_id)
            .field("access_token", &"<redacted>")
            .field("pull_request_id", &self.pull_request_id)
            .field("title", &self.title)
            .field("source_ref", &self.source_ref)
            .field("target_ref", &self.target_ref)
            .field("author", &self.author)
            .finish()
    }
}
