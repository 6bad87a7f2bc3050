//! Git operations of the release workflow
//!
//! Mutating git work (fetch, checkout, pull, reset) runs through the git CLI
//! via the [crate::runner] so it shares retry and failure handling with the
//! other external commands. Read-only inspection of the working copy goes
//! through the [WorkingCopy] trait:
//!
//! - [repository::Git2WorkingCopy]: real implementation using the `git2` crate
//! - [mock::MockWorkingCopy]: mock implementation for testing
//!
//! [orchestrator::GitOrchestrator] combines both.

pub mod mock;
pub mod orchestrator;
pub mod repository;

pub use mock::MockWorkingCopy;
pub use orchestrator::GitOrchestrator;
pub use repository::Git2WorkingCopy;

use crate::error::Result;

/// Read-only view of the local repository
///
/// ## Thread Safety
///
/// All implementors must be `Send + Sync`.
///
/// ## Error Handling
///
/// Implementations map `git2::Error` to [crate::error::ReleaseError::Git].
pub trait WorkingCopy: Send + Sync {
    /// Whether the clone has truncated history
    fn is_shallow(&self) -> Result<bool>;

    /// Whether tracked files differ from HEAD; untracked files are ignored
    fn has_tracked_changes(&self) -> Result<bool>;
}
