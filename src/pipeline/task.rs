use std::fmt;

/// Terminal state reported back to the pipeline host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskResult {
    Succeeded,
    Failed,
    Skipped,
}

impl TaskResult {
    /// Name used by the `task.complete` logging command
    pub fn name(&self) -> &'static str {
        match self {
            TaskResult::Succeeded => "Succeeded",
            TaskResult::Failed => "Failed",
            TaskResult::Skipped => "Skipped",
        }
    }

    /// Process exit code for this result
    pub fn exit_code(&self) -> i32 {
        match self {
            TaskResult::Failed => 1,
            TaskResult::Succeeded | TaskResult::Skipped => 0,
        }
    }
}

impl fmt::Display for TaskResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result plus the message shown by the pipeline host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    pub result: TaskResult,
    pub message: String,
}

impl TaskOutcome {
    pub fn succeeded(message: impl Into<String>) -> Self {
        TaskOutcome {
            result: TaskResult::Succeeded,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        TaskOutcome {
            result: TaskResult::Failed,
            message: message.into(),
        }
    }

    pub fn skipped(message: impl Into<String>) -> Self {
        TaskOutcome {
            result: TaskResult::Skipped,
            message: message.into(),
        }
    }

    /// Render the `##vso[task.complete]` logging command understood by the agent.
    pub fn to_logging_command(&self) -> String {
        format!(
            "##vso[task.complete result={};]{}",
            self.result.name(),
            escape_data(&self.message)
        )
    }
}

/// Escape a logging command payload the same way the agent task library does.
fn escape_data(value: &str) -> String {
    value
        .replace('%', "%AZP25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_command_succeeded() {
        let outcome = TaskOutcome::succeeded("App published");
        assert_eq!(
            outcome.to_logging_command(),
            "##vso[task.complete result=Succeeded;]App published"
        );
    }

    #[test]
    fn test_logging_command_skipped() {
        let outcome = TaskOutcome::skipped("Ignoring publish");
        assert_eq!(
            outcome.to_logging_command(),
            "##vso[task.complete result=Skipped;]Ignoring publish"
        );
    }

    #[test]
    fn test_logging_command_escapes_message() {
        let outcome = TaskOutcome::failed("100% broken\r\nsecond line");
        assert_eq!(
            outcome.to_logging_command(),
            "##vso[task.complete result=Failed;]100%AZP25 broken%0D%0Asecond line"
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(TaskResult::Succeeded.exit_code(), 0);
        assert_eq!(TaskResult::Skipped.exit_code(), 0);
        assert_eq!(TaskResult::Failed.exit_code(), 1);
    }
}
