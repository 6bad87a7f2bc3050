use std::path::PathBuf;

use crate::domain::pull_request::branch_name;
use crate::domain::PullRequest;
use crate::error::{ReleaseError, Result};
use crate::git::WorkingCopy;
use crate::host::CodeHost;
use crate::runner::{self, CommandRunner, CommandSpec, CommandStep, RunOptions};

pub const STEP_IDENTITY: &str = "set-git-identity";
pub const STEP_CHECKOUT: &str = "checkout";
pub const STEP_RESET: &str = "reset-hard";

fn git() -> CommandSpec {
    CommandSpec::new("git")
}

/// Sequences the git side of a release
pub struct GitOrchestrator<'a> {
    runner: &'a dyn CommandRunner,
    working_copy: &'a dyn WorkingCopy,
    working_dir: PathBuf,
    retries: u32,
}

impl<'a> GitOrchestrator<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        working_copy: &'a dyn WorkingCopy,
        working_dir: impl Into<PathBuf>,
        retries: u32,
    ) -> Self {
        GitOrchestrator {
            runner,
            working_copy,
            working_dir: working_dir.into(),
            retries,
        }
    }

    /// Configure the global author used by commit-producing steps.
    pub fn set_identity(&self, name: &str, email: &str) -> Result<()> {
        let step = CommandStep::composite(
            STEP_IDENTITY,
            vec![
                git().args(["config", "--global", "user.name", name]),
                git().args(["config", "--global", "user.email", email]),
            ],
        );
        runner::run(
            self.runner,
            &step,
            &self.working_dir,
            &RunOptions::new("Git identity configured").retries(self.retries),
        )?;
        Ok(())
    }

    /// Build the checkout step for `ref_name`.
    ///
    /// `git fetch --unshallow` is only included while the clone is shallow,
    /// so the step also succeeds on a full clone.
    pub fn checkout_step(&self, ref_name: &str) -> Result<CommandStep> {
        let branch = branch_name(ref_name);
        let mut commands = vec![
            git().args(["fetch", "origin"]),
            git().args(["checkout", branch]),
            git().args(["pull", "origin", branch]),
        ];
        if self.working_copy.is_shallow()? {
            log::debug!("Shallow clone detected, fetching full history");
            commands.push(git().args(["fetch", "--unshallow"]));
        }
        commands.push(git().args(["rev-list", "HEAD", "--pretty=oneline"]));
        Ok(CommandStep::composite(STEP_CHECKOUT, commands))
    }

    /// Check out and update a branch; returns the commit history listing.
    ///
    /// The step is rebuilt before every attempt: an earlier attempt may have
    /// unshallowed the clone before a later command failed.
    pub fn checkout_source(&self, ref_name: &str) -> Result<String> {
        let options = RunOptions::new(format!("Checked out {}", branch_name(ref_name)))
            .hide_output(true);
        let mut remaining = self.retries;

        loop {
            let step = self.checkout_step(ref_name)?;
            match runner::run(self.runner, &step, &self.working_dir, &options) {
                Ok(history) => return Ok(history),
                Err(e) if remaining == 0 => return Err(e),
                Err(e) => {
                    remaining -= 1;
                    log::warn!("Retrying checkout of {} after: {}", ref_name, e);
                }
            }
        }
    }

    /// Complete the pull request, bypassing policies and deleting the source
    /// branch.
    pub fn complete_and_merge(&self, host: &dyn CodeHost, pull_request: &PullRequest) -> Result<()> {
        host.complete_pull_request(pull_request).map_err(|e| {
            ReleaseError::pull_request(format!(
                "Could not complete pull request {} ({} -> {}): {}",
                pull_request.pull_request_id,
                pull_request.source_ref_name,
                pull_request.target_ref_name,
                e
            ))
        })?;
        log::info!(
            "Completed pull request {} into {}",
            pull_request.pull_request_id,
            pull_request.target_ref_name
        );
        Ok(())
    }

    /// Discard local modifications left behind by the publish step.
    pub fn reset_hard(&self) -> Result<()> {
        let step = CommandStep::single(STEP_RESET, git().args(["reset", "--hard"]));
        runner::run(
            self.runner,
            &step,
            &self.working_dir,
            &RunOptions::new("Working tree reset").retries(self.retries),
        )?;

        match self.working_copy.has_tracked_changes() {
            Ok(true) => log::warn!("Tracked changes remain after reset"),
            Ok(false) => {}
            Err(e) => log::debug!("Could not inspect working tree: {}", e),
        }
        Ok(())
    }
}
