use std::path::Path;
use std::sync::Mutex;

use crate::error::{ReleaseError, Result};
use crate::runner::{CommandResult, CommandRunner, CommandSpec};

#[derive(Debug, Clone)]
enum Behaviour {
    Succeed(String),
    Fail { status: i32, stderr: String },
    FailTimes { remaining: usize, stdout: String },
    SpawnError,
}

#[derive(Debug, Clone)]
struct Rule {
    prefix: String,
    behaviour: Behaviour,
}

/// Scripted command runner for testing without spawning processes
///
/// Rules match on the rendered command line prefix and are checked in the
/// order they were added. Unmatched commands succeed with empty output.
pub struct MockRunner {
    rules: Mutex<Vec<Rule>>,
    invocations: Mutex<Vec<String>>,
}

impl MockRunner {
    /// Create a runner where every command succeeds with empty output
    pub fn new() -> Self {
        MockRunner {
            rules: Mutex::new(Vec::new()),
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// Commands starting with `prefix` succeed and print `stdout`
    pub fn succeed_with(self, prefix: impl Into<String>, stdout: impl Into<String>) -> Self {
        self.push(prefix, Behaviour::Succeed(stdout.into()))
    }

    /// Commands starting with `prefix` always exit non-zero
    pub fn fail(self, prefix: impl Into<String>, status: i32, stderr: impl Into<String>) -> Self {
        self.push(
            prefix,
            Behaviour::Fail {
                status,
                stderr: stderr.into(),
            },
        )
    }

    /// Commands starting with `prefix` fail `times` times, then succeed
    pub fn fail_times(self, prefix: impl Into<String>, times: usize, stdout: impl Into<String>) -> Self {
        self.push(
            prefix,
            Behaviour::FailTimes {
                remaining: times,
                stdout: stdout.into(),
            },
        )
    }

    /// Commands starting with `prefix` cannot be spawned at all
    pub fn spawn_error(self, prefix: impl Into<String>) -> Self {
        self.push(prefix, Behaviour::SpawnError)
    }

    /// Every command line executed so far, in order
    pub fn invocations(&self) -> Vec<String> {
        self.invocations
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Number of executed command lines starting with `prefix`
    pub fn count(&self, prefix: &str) -> usize {
        self.invocations()
            .iter()
            .filter(|line| line.starts_with(prefix))
            .count()
    }

    fn push(self, prefix: impl Into<String>, behaviour: Behaviour) -> Self {
        if let Ok(mut rules) = self.rules.lock() {
            rules.push(Rule {
                prefix: prefix.into(),
                behaviour,
            });
        }
        self
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for MockRunner {
    fn execute(&self, command: &CommandSpec, _cwd: &Path, _hide_output: bool) -> Result<CommandResult> {
        let line = command.to_string();
        if let Ok(mut calls) = self.invocations.lock() {
            calls.push(line.clone());
        }

        let mut rules = self
            .rules
            .lock()
            .map_err(|_| ReleaseError::command(&line, "mock runner lock poisoned"))?;

        let rule = match rules.iter_mut().find(|rule| line.starts_with(&rule.prefix)) {
            Some(rule) => rule,
            None => return Ok(CommandResult::ok("")),
        };

        match &mut rule.behaviour {
            Behaviour::Succeed(stdout) => Ok(CommandResult::ok(stdout.clone())),
            Behaviour::Fail { status, stderr } => Ok(CommandResult::failed(*status, stderr.clone())),
            Behaviour::FailTimes { remaining, stdout } => {
                if *remaining > 0 {
                    *remaining -= 1;
                    Ok(CommandResult::failed(1, "transient failure"))
                } else {
                    Ok(CommandResult::ok(stdout.clone()))
                }
            }
            Behaviour::SpawnError => Err(ReleaseError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("program not found: {}", command.program),
            ))),
        }
    }
}
