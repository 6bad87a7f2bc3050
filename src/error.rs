use thiserror::Error;

/// Unified error type for pr-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Classification error: {0}")]
    Classification(String),

    #[error("Version resolution error: {0}")]
    VersionResolution(String),

    #[error("Command '{step}' failed: {message}")]
    Command { step: String, message: String },

    #[error("Pull request error: {0}")]
    PullRequest(String),

    #[error("Label error: {0}")]
    Label(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("API request to {url} failed with status {status}: {body}")]
    Api {
        url: String,
        status: u16,
        body: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in pr-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a classification error with context
    pub fn classification(msg: impl Into<String>) -> Self {
        ReleaseError::Classification(msg.into())
    }

    /// Create a version resolution error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseError::VersionResolution(msg.into())
    }

    /// Create a command error for the named step
    pub fn command(step: impl Into<String>, msg: impl Into<String>) -> Self {
        ReleaseError::Command {
            step: step.into(),
            message: msg.into(),
        }
    }

    /// Create a pull request lifecycle error with context
    pub fn pull_request(msg: impl Into<String>) -> Self {
        ReleaseError::PullRequest(msg.into())
    }

    /// Create a label error with context
    pub fn label(msg: impl Into<String>) -> Self {
        ReleaseError::Label(msg.into())
    }

    /// Create a notification error with context
    pub fn notification(msg: impl Into<String>) -> Self {
        ReleaseError::Notification(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReleaseError::config("missing input apiKey");
        assert_eq!(err.to_string(), "Configuration error: missing input apiKey");
    }

    #[test]
    fn test_command_error_names_step() {
        let err = ReleaseError::command("vtex publish", "exit status 1");
        assert_eq!(err.to_string(), "Command 'vtex publish' failed: exit status 1");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReleaseError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_api_error_includes_status_and_body() {
        let err = ReleaseError::Api {
            url: "https://dev.azure.com/org/_apis/git".to_string(),
            status: 409,
            body: "active pull request exists".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("409"));
        assert!(msg.contains("active pull request exists"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (ReleaseError::config("x"), "Configuration error"),
            (ReleaseError::classification("x"), "Classification error"),
            (ReleaseError::version("x"), "Version resolution error"),
            (ReleaseError::pull_request("x"), "Pull request error"),
            (ReleaseError::label("x"), "Label error"),
            (ReleaseError::notification("x"), "Notification error"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }

    #[test]
    fn test_error_special_characters_in_messages() {
        let special_chars = vec![
            "message with\nnewline",
            "message with 'quotes'",
            "label with: colon",
        ];

        for msg in special_chars {
            let err = ReleaseError::label(msg);
            assert!(err.to_string().contains(msg));
        }
    }
}
