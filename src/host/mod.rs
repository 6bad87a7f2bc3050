//! Code-hosting service abstraction layer
//!
//! The [CodeHost] trait covers the pull-request operations the tasks consume.
//! The concrete implementations are:
//!
//! - [azure::AzureDevOpsClient]: REST client for the Azure DevOps Git API
//! - [mock::MockCodeHost]: in-memory implementation for testing
//!
//! Orchestration code depends on the trait only.

pub mod azure;
pub mod mock;

pub use azure::{AzureDevOpsClient, HostSettings};
pub use mock::MockCodeHost;

use serde::Deserialize;

use crate::domain::{CommitRef, NewPullRequest, PullRequest};
use crate::error::Result;

/// A label attached to a pull request
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Label {
    #[serde(default)]
    pub id: String,
    pub name: String,
}

/// Handle of a created comment thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ThreadHandle {
    pub id: i64,
}

/// Pull-request operations of the code-hosting service
///
/// ## Thread Safety
///
/// Implementors must be `Send + Sync`.
///
/// ## Error Handling
///
/// Transport failures map to [crate::error::ReleaseError::Http], non-success
/// responses to [crate::error::ReleaseError::Api].
pub trait CodeHost: Send + Sync {
    /// Fetch a pull request by id
    fn get_pull_request(&self, pull_request_id: i64) -> Result<PullRequest>;

    /// Open a new pull request
    fn create_pull_request(&self, request: &NewPullRequest) -> Result<PullRequest>;

    /// Complete (merge) a pull request, bypassing policies and deleting the
    /// source branch
    fn complete_pull_request(&self, pull_request: &PullRequest) -> Result<()>;

    /// Create a closed comment thread carrying `content`
    fn create_thread(&self, pull_request_id: i64, content: &str) -> Result<ThreadHandle>;

    /// Labels currently attached to a pull request
    fn list_labels(&self, pull_request_id: i64) -> Result<Vec<Label>>;

    /// Attach a label
    fn add_label(&self, pull_request_id: i64, name: &str) -> Result<()>;

    /// Detach a label by name
    fn remove_label(&self, pull_request_id: i64, name: &str) -> Result<()>;

    /// Replace the whole label set of a pull request
    fn replace_labels(&self, pull_request_id: i64, names: &[String]) -> Result<()>;

    /// Commits included in a pull request
    fn pull_request_commits(&self, pull_request_id: i64) -> Result<Vec<CommitRef>>;
}
