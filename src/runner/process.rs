use std::path::Path;
use std::process::Command;

use crate::error::Result;
use crate::runner::{CommandResult, CommandRunner, CommandSpec};

/// Runs commands as child processes without an intermediate shell
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn execute(&self, command: &CommandSpec, cwd: &Path, hide_output: bool) -> Result<CommandResult> {
        let output = Command::new(&command.program)
            .args(&command.args)
            .current_dir(cwd)
            .output()?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !hide_output {
            if !stdout.is_empty() {
                println!("{}", stdout.trim_end());
            }
            if !stderr.is_empty() {
                eprintln!("{}", stderr.trim_end());
            }
        }

        Ok(CommandResult {
            success: output.status.success(),
            status: output.status.code(),
            stdout,
            stderr,
        })
    }
}
