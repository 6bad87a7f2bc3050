use clap::Args;

use crate::config::{validate_input, TaskConfig};
use crate::connection::{self, Connection};
use crate::domain::PullRequest;
use crate::error::Result;
use crate::notify::NotificationService;
use crate::pipeline::TaskOutcome;
use crate::release::{propagate, Clock, SystemClock};

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct MergeIntoArgs {
    #[arg(long, env = "INPUT_BRANCH", help = "Branch receiving the pull request's source branch")]
    pub branch: String,
}

/// Create and complete a pull request from the current source branch into
/// `args.branch`.
pub fn execute(
    args: &MergeIntoArgs,
    task: &TaskConfig,
    connection: &Connection,
    clock: &dyn Clock,
) -> Result<PullRequest> {
    validate_input("branch", Some(&args.branch))?;
    let notifier = NotificationService::for_connection(connection);
    propagate::merge_into(
        connection.host.as_ref(),
        &notifier,
        clock,
        task.config.consistency_wait(),
        &connection.pull_request,
        &args.branch,
    )
}

pub fn run(args: &MergeIntoArgs, task: &TaskConfig) -> TaskOutcome {
    let result = validate_input("branch", Some(&args.branch)).and_then(|_| {
        let connection = connection::connect(&task.env, &task.config)?;
        execute(args, task, &connection, &SystemClock)
    });

    match result {
        Ok(created) => TaskOutcome::succeeded(format!(
            "Pull request {} into {} created and completed",
            created.pull_request_id, created.target_ref_name
        )),
        Err(e) => super::failed(e),
    }
}
