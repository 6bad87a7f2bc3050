use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;

use pr_release::cli::{self, Cli};
use pr_release::config::{self, TaskConfig};
use pr_release::pipeline::{PipelineEnv, TaskOutcome};
use pr_release::ui;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Cli::parse();

    let outcome = match config::load_config(args.config.as_deref()) {
        Ok(config) => {
            let task = TaskConfig::new(config, PipelineEnv::from_env());
            log::debug!("Task configuration: {:?}", task);
            cli::run(&args, &task)
        }
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            TaskOutcome::failed(e.to_string())
        }
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", outcome.to_logging_command())
        .context("Failed to report the task result")?;
    stdout.flush().context("Failed to flush stdout")?;

    std::process::exit(outcome.result.exit_code());
}
