use clap::Args;

use crate::config::{validate_input, TaskConfig};
use crate::connection::{self, Connection};
use crate::error::Result;
use crate::labels::{self, LabelReport};
use crate::pipeline::TaskOutcome;
use crate::runner::{CommandRunner, ProcessRunner};

#[derive(Args, Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelsArgs {
    #[arg(long, env = "INPUT_CUSTOMLABELS", default_value = "", help = "Comma separated labels added to the suggested ones")]
    pub custom_labels: String,

    #[arg(long, env = "INPUT_DRYRUN", help = "Plan label changes without applying them")]
    pub dry_run: bool,

    #[arg(long, env = "INPUT_REMOVEOUTDATEDLABELS", help = "Remove labels that are no longer suggested")]
    pub remove_outdated_labels: bool,
}

/// Suggest and reconcile labels over an established connection.
pub fn execute(
    args: &LabelsArgs,
    task: &TaskConfig,
    connection: &Connection,
    runner: &dyn CommandRunner,
) -> Result<LabelReport> {
    validate_input("customLabels", Some(&args.custom_labels))?;
    let suggested = labels::suggest(runner, task.working_dir(), &task.config, &args.custom_labels)?;
    labels::reconcile(
        connection.host.as_ref(),
        connection.pull_request_id(),
        &suggested,
        args.remove_outdated_labels,
        args.dry_run,
    )
}

pub fn run(args: &LabelsArgs, task: &TaskConfig) -> TaskOutcome {
    let result = validate_input("customLabels", Some(&args.custom_labels)).and_then(|_| {
        let connection = connection::connect(&task.env, &task.config)?;
        execute(args, task, &connection, &ProcessRunner)
    });

    match result {
        Ok(report) => TaskOutcome::succeeded(report.message()),
        Err(e) => super::failed(e),
    }
}
