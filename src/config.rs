use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::ProbeFormat;
use crate::error::{ReleaseError, Result};
use crate::pipeline::PipelineEnv;

/// File name looked up in the working directory and the user config directory.
pub const CONFIG_FILE_NAME: &str = "pr-release.toml";

/// Input value the pipeline UI uses as an explicit invalid placeholder.
const REJECTED_INPUT: &str = "bad";

/// Represents the optional file layer of the release tasks.
///
/// Everything here has a default, so a missing file is never an error.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// External release tool invoked for probe, changelog, publish and labels
    #[serde(default = "default_tool")]
    pub tool: String,

    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,

    /// Wait after completing or creating a pull request
    #[serde(default = "default_consistency_wait_secs")]
    pub consistency_wait_secs: u64,

    #[serde(default)]
    pub retries: RetryConfig,

    #[serde(default)]
    pub probe_format: ProbeFormat,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

fn default_tool() -> String {
    "projex".to_string()
}

fn default_working_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_consistency_wait_secs() -> u64 {
    30
}

fn default_api_version() -> String {
    "7.1".to_string()
}

fn default_http_timeout_secs() -> u64 {
    30
}

/// Retry budgets per command family.
///
/// A budget of `n` means at most `n + 1` attempts.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct RetryConfig {
    #[serde(default)]
    pub git: u32,

    #[serde(default)]
    pub publish: u32,

    #[serde(default)]
    pub probe: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tool: default_tool(),
            working_dir: default_working_dir(),
            consistency_wait_secs: default_consistency_wait_secs(),
            retries: RetryConfig::default(),
            probe_format: ProbeFormat::default(),
            api_version: default_api_version(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

impl Config {
    pub fn consistency_wait(&self) -> Duration {
        Duration::from_secs(self.consistency_wait_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `pr-release.toml` in current directory
/// 3. `pr-release.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let path = if let Some(path) = config_path {
        PathBuf::from(path)
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        PathBuf::from(CONFIG_FILE_NAME)
    } else if let Some(config_dir) = dirs::config_dir() {
        let candidate = config_dir.join(CONFIG_FILE_NAME);
        if candidate.exists() {
            candidate
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    log::debug!("Loading configuration from {}", path.display());
    let config_str = fs::read_to_string(&path).map_err(|e| {
        ReleaseError::config(format!("Cannot read config file {}: {}", path.display(), e))
    })?;

    toml::from_str(&config_str).map_err(|e| {
        ReleaseError::config(format!("Invalid config file {}: {}", path.display(), e))
    })
}

/// Credentials for the release tool's login step.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    pub account: String,
    pub email: String,
    pub api_key: String,
    pub api_token: String,
}

impl LoginCredentials {
    /// Build credentials only when every input is present and non-blank.
    pub fn from_inputs(
        account: Option<&str>,
        email: Option<&str>,
        api_key: Option<&str>,
        api_token: Option<&str>,
    ) -> Option<Self> {
        let present = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Some(LoginCredentials {
            account: present(account)?,
            email: present(email)?,
            api_key: present(api_key)?,
            api_token: present(api_token)?,
        })
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("account", &self.account)
            .field("email", &self.email)
            .field("api_key", &"<redacted>")
            .field("api_token", &"<redacted>")
            .finish()
    }
}

/// Reject the literal placeholder `bad` for a named task input.
pub fn validate_input(name: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(v) if v.trim() == REJECTED_INPUT => Err(ReleaseError::config(format!(
            "Invalid value '{}' for input '{}'",
            REJECTED_INPUT, name
        ))),
        _ => Ok(()),
    }
}

/// Check the working directory holds an app: a manifest and a changelog.
pub fn check_app_root(dir: &Path) -> Result<()> {
    let has_manifest = dir.join("manifest.json").is_file() || dir.join("package.json").is_file();
    if !has_manifest {
        return Err(ReleaseError::config(format!(
            "No manifest.json or package.json found in {}",
            dir.display()
        )));
    }

    if !dir.join("CHANGELOG.md").is_file() {
        return Err(ReleaseError::config(format!(
            "No CHANGELOG.md found in {}",
            dir.display()
        )));
    }

    Ok(())
}

/// Everything a task needs, assembled once at process entry.
///
/// Orchestration code receives this by reference and never consults the
/// process environment itself.
#[derive(Debug, Clone)]
pub struct TaskConfig {
    pub config: Config,
    pub env: PipelineEnv,
}

impl TaskConfig {
    pub fn new(config: Config, env: PipelineEnv) -> Self {
        TaskConfig { config, env }
    }

    pub fn working_dir(&self) -> &Path {
        &self.config.working_dir
    }
}
