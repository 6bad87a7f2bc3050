//! Release workflow
//!
//! [orchestrator::ReleaseOrchestrator] drives a single publish run through
//! the [ReleaseStep]s below. A failing step ends the run; nothing already
//! applied (a completed pull request, a published version) is rolled back.

pub mod clock;
pub mod orchestrator;
pub mod propagate;
pub mod tool;
pub mod version;

pub use clock::{Clock, RecordingClock, SystemClock};
pub use orchestrator::ReleaseOrchestrator;

use std::fmt;

use crate::pipeline::TaskOutcome;

/// Variant of the release workflow selected by the task inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseMode {
    /// Publish a prerelease without completing the pull request
    pub beta: bool,
    /// Deploy after publishing
    pub deploy: bool,
    /// After a beta publish, propagate the source branch into `dev_branch`
    pub merge_into_develop: bool,
    pub force_publish: bool,
    pub dev_branch: String,
}

impl Default for ReleaseMode {
    fn default() -> Self {
        ReleaseMode {
            beta: false,
            deploy: false,
            merge_into_develop: false,
            force_publish: false,
            dev_branch: "develop".to_string(),
        }
    }
}

/// Step of a release run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReleaseStep {
    /// Manifest and changelog present in the working directory
    CheckAppRoot,
    Classify,
    /// `[no-beta]` / `[no-publish]` handling
    CheckSkips,
    /// Release tool login, when credentials are configured
    Login,
    ResolveVersion,
    SetGitIdentity,
    CheckoutSource,
    NotifyStart,
    CompletePullRequest,
    /// Consistency wait after completing the pull request
    WaitAfterComplete,
    CheckoutTarget,
    UpdateChangelog,
    Publish,
    Deploy,
    ResetHard,
    /// Beta propagation into the development branch
    MergeIntoDevelop,
    NotifySuccess,
}

impl ReleaseStep {
    pub fn name(&self) -> &'static str {
        match self {
            ReleaseStep::CheckAppRoot => "check-app-root",
            ReleaseStep::Classify => "classify",
            ReleaseStep::CheckSkips => "check-skips",
            ReleaseStep::Login => "login",
            ReleaseStep::ResolveVersion => "resolve-version",
            ReleaseStep::SetGitIdentity => "set-git-identity",
            ReleaseStep::CheckoutSource => "checkout-source",
            ReleaseStep::NotifyStart => "notify-start",
            ReleaseStep::CompletePullRequest => "complete-pull-request",
            ReleaseStep::WaitAfterComplete => "wait-after-complete",
            ReleaseStep::CheckoutTarget => "checkout-target",
            ReleaseStep::UpdateChangelog => "update-changelog",
            ReleaseStep::Publish => "publish",
            ReleaseStep::Deploy => "deploy",
            ReleaseStep::ResetHard => "reset-hard",
            ReleaseStep::MergeIntoDevelop => "merge-into-develop",
            ReleaseStep::NotifySuccess => "notify-success",
        }
    }
}

impl fmt::Display for ReleaseStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Non-error end of a release run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Succeeded(String),
    Skipped(String),
}

impl ReleaseOutcome {
    pub fn message(&self) -> &str {
        match self {
            ReleaseOutcome::Succeeded(message) | ReleaseOutcome::Skipped(message) => message,
        }
    }
}

impl From<ReleaseOutcome> for TaskOutcome {
    fn from(outcome: ReleaseOutcome) -> Self {
        match outcome {
            ReleaseOutcome::Succeeded(message) => TaskOutcome::succeeded(message),
            ReleaseOutcome::Skipped(message) => TaskOutcome::skipped(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::TaskResult;

    #[test]
    fn test_outcome_maps_to_task_result() {
        let skipped: TaskOutcome = ReleaseOutcome::Skipped("no publish".to_string()).into();
        assert_eq!(skipped.result, TaskResult::Skipped);

        let done: TaskOutcome = ReleaseOutcome::Succeeded("done".to_string()).into();
        assert_eq!(done.result, TaskResult::Succeeded);
        assert_eq!(done.message, "done");
    }

    #[test]
    fn test_steps_are_ordered() {
        assert!(ReleaseStep::Classify < ReleaseStep::CheckSkips);
        assert!(ReleaseStep::CheckSkips < ReleaseStep::ResolveVersion);
        assert!(ReleaseStep::ResetHard < ReleaseStep::NotifySuccess);
    }
}
