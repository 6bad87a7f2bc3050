//! External command execution
//!
//! Commands are argv lists handed straight to the OS process primitive, never
//! to a shell. Sequences that used to be chained with `&&` are expressed as a
//! [CommandStep]: its commands run in order, the first failure stops the
//! step, and a retry re-runs the step from its first command.
//!
//! - [process::ProcessRunner]: real implementation backed by `std::process`
//! - [mock::MockRunner]: scripted implementation for tests

pub mod mock;
pub mod process;

pub use mock::MockRunner;
pub use process::ProcessRunner;

use std::fmt;
use std::path::Path;

use crate::error::{ReleaseError, Result};
use crate::ui;

/// A single program invocation as an argv list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append `arg` only when `condition` holds.
    pub fn arg_if(self, condition: bool, arg: impl Into<String>) -> Self {
        if condition {
            self.arg(arg)
        } else {
            self
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// One or more commands executed as a single retryable unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandStep {
    pub name: String,
    pub commands: Vec<CommandSpec>,
}

impl CommandStep {
    /// A step made of a single command.
    pub fn single(name: impl Into<String>, command: CommandSpec) -> Self {
        CommandStep {
            name: name.into(),
            commands: vec![command],
        }
    }

    /// A composite step; commands run in order and stop at the first failure.
    pub fn composite(name: impl Into<String>, commands: Vec<CommandSpec>) -> Self {
        CommandStep {
            name: name.into(),
            commands,
        }
    }
}

impl fmt::Display for CommandStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.commands.iter().map(|c| c.to_string()).collect();
        f.write_str(&rendered.join(" && "))
    }
}

/// Captured result of one process execution
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandResult {
    pub stdout: String,
    pub success: bool,
    pub stderr: String,
    pub status: Option<i32>,
}

impl CommandResult {
    pub fn ok(stdout: impl Into<String>) -> Self {
        CommandResult {
            stdout: stdout.into(),
            success: true,
            stderr: String::new(),
            status: Some(0),
        }
    }

    pub fn failed(status: i32, stderr: impl Into<String>) -> Self {
        CommandResult {
            stdout: String::new(),
            success: false,
            stderr: stderr.into(),
            status: Some(status),
        }
    }

    /// Human readable failure text surfaced to the task result.
    pub fn error_text(&self, command: &CommandSpec) -> String {
        let code = self
            .status
            .map(|c| c.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            format!("Command '{}' exited with error code: {}", command, code)
        } else {
            format!(
                "Command '{}' exited with error code: {}\n{}",
                command, code, stderr
            )
        }
    }
}

/// Executes external programs
///
/// Implementations return `Ok` with `success == false` for a process that ran
/// and exited non-zero, and `Err` only when the process could not be spawned.
pub trait CommandRunner: Send + Sync {
    fn execute(&self, command: &CommandSpec, cwd: &Path, hide_output: bool)
        -> Result<CommandResult>;
}

/// Per-invocation behaviour of [run]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub success_message: String,
    pub hide_output: bool,
    pub retries: u32,
    pub hide_success_message: bool,
    pub throw_on_error: bool,
}

impl RunOptions {
    pub fn new(success_message: impl Into<String>) -> Self {
        RunOptions {
            success_message: success_message.into(),
            hide_output: false,
            retries: 0,
            hide_success_message: false,
            throw_on_error: true,
        }
    }

    pub fn hide_output(mut self, hide: bool) -> Self {
        self.hide_output = hide;
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn hide_success_message(mut self, hide: bool) -> Self {
        self.hide_success_message = hide;
        self
    }

    pub fn throw_on_error(mut self, throw: bool) -> Self {
        self.throw_on_error = throw;
        self
    }
}

/// Run a step with immediate retries.
///
/// The step is attempted `options.retries + 1` times at most. On success the
/// captured stdout of every command is returned, joined in order. When all
/// attempts fail, a `ReleaseError::Command` is returned if
/// `options.throw_on_error` is set; otherwise the failure text is returned as
/// the output.
pub fn run(
    runner: &dyn CommandRunner,
    step: &CommandStep,
    cwd: &Path,
    options: &RunOptions,
) -> Result<String> {
    let mut remaining = options.retries;

    loop {
        match attempt(runner, step, cwd, options.hide_output) {
            Ok(stdout) => {
                if !options.hide_success_message {
                    ui::display_success(&format!("{} >  {}", options.success_message, step));
                }
                return Ok(stdout);
            }
            Err(error_text) => {
                ui::display_error(&error_text);

                if remaining == 0 {
                    if options.throw_on_error {
                        return Err(ReleaseError::command(&step.name, error_text));
                    }
                    return Ok(error_text);
                }

                remaining -= 1;
                log::warn!(
                    "Retrying '{}' ({} retr{} left)",
                    step.name,
                    remaining,
                    if remaining == 1 { "y" } else { "ies" }
                );
            }
        }
    }
}

fn attempt(
    runner: &dyn CommandRunner,
    step: &CommandStep,
    cwd: &Path,
    hide_output: bool,
) -> std::result::Result<String, String> {
    let mut output = String::new();

    for command in &step.commands {
        log::debug!("Executing: {}", command);
        let result = runner
            .execute(command, cwd, hide_output)
            .map_err(|e| format!("Command '{}' could not be started: {}", command, e))?;

        if !result.success {
            return Err(result.error_text(command));
        }

        output.push_str(&result.stdout);
    }

    Ok(output)
}
