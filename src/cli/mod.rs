//! Command line surface
//!
//! Every task input is a flag that also reads the pipeline's
//! `INPUT_<NAME>` binding, so the same binary runs both from a pipeline task
//! and by hand.

pub mod commands;

use clap::{Parser, Subcommand};

use crate::config::TaskConfig;
use crate::pipeline::TaskOutcome;

pub use commands::labels::LabelsArgs;
pub use commands::merge_into::MergeIntoArgs;
pub use commands::release::ReleaseArgs;

#[derive(Parser, Debug)]
#[command(
    name = "pr-release",
    version,
    about = "Release automation for pull request pipelines"
)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Publish the app of the current pull request
    Release(ReleaseArgs),
    /// Reconcile pull request labels with the suggested set
    Labels(LabelsArgs),
    /// Carry the pull request's source branch into another branch
    MergeInto(MergeIntoArgs),
}

/// Run the selected task against the live services.
pub fn run(cli: &Cli, task: &TaskConfig) -> TaskOutcome {
    match &cli.command {
        Commands::Release(args) => commands::release::run(args, task),
        Commands::Labels(args) => commands::labels::run(args, task),
        Commands::MergeInto(args) => commands::merge_into::run(args, task),
    }
}
