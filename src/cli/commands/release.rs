use clap::Args;

use crate::config::{validate_input, LoginCredentials, TaskConfig};
use crate::connection::{self, Connection};
use crate::error::Result;
use crate::git::{Git2WorkingCopy, WorkingCopy};
use crate::pipeline::TaskOutcome;
use crate::release::{Clock, ReleaseMode, ReleaseOrchestrator, ReleaseOutcome, SystemClock};
use crate::runner::{CommandRunner, ProcessRunner};

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ReleaseArgs {
    #[arg(long, env = "INPUT_BETA", help = "Publish a prerelease without completing the pull request")]
    pub beta: bool,

    #[arg(long = "with-deploy", env = "INPUT_DEPLOY", help = "Deploy after publishing")]
    pub deploy: bool,

    #[arg(long, env = "INPUT_MERGEINTODEVELOP", help = "After a beta, merge the source branch into the development branch")]
    pub merge_into_develop: bool,

    #[arg(long, env = "INPUT_FORCEPUBLISH", help = "Pass --force to the publish command")]
    pub force_publish: bool,

    #[arg(long, env = "INPUT_DEVBRANCH", default_value = "develop")]
    pub dev_branch: String,

    #[arg(long, env = "INPUT_ACCOUNT")]
    pub account: Option<String>,

    #[arg(long, env = "INPUT_EMAIL")]
    pub email: Option<String>,

    #[arg(long, env = "INPUT_APIKEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "INPUT_APITOKEN", hide_env_values = true)]
    pub api_token: Option<String>,
}

impl ReleaseArgs {
    pub fn validate(&self) -> Result<()> {
        validate_input("devBranch", Some(&self.dev_branch))?;
        validate_input("account", self.account.as_deref())?;
        validate_input("email", self.email.as_deref())?;
        validate_input("apiKey", self.api_key.as_deref())?;
        validate_input("apiToken", self.api_token.as_deref())
    }

    pub fn mode(&self) -> ReleaseMode {
        ReleaseMode {
            beta: self.beta,
            deploy: self.deploy,
            merge_into_develop: self.merge_into_develop,
            force_publish: self.force_publish,
            dev_branch: self.dev_branch.clone(),
        }
    }

    pub fn credentials(&self) -> Option<LoginCredentials> {
        LoginCredentials::from_inputs(
            self.account.as_deref(),
            self.email.as_deref(),
            self.api_key.as_deref(),
            self.api_token.as_deref(),
        )
    }
}

/// Run a release over an established connection.
pub fn execute(
    args: &ReleaseArgs,
    task: &TaskConfig,
    connection: &Connection,
    runner: &dyn CommandRunner,
    working_copy: &dyn WorkingCopy,
    clock: &dyn Clock,
) -> Result<ReleaseOutcome> {
    args.validate()?;
    ReleaseOrchestrator::new(connection, runner, working_copy, clock, &task.config)
        .mode(args.mode())
        .identity(&task.env.requested_for, &task.env.requested_for_email)
        .login(args.credentials())
        .run()
}

pub fn run(args: &ReleaseArgs, task: &TaskConfig) -> TaskOutcome {
    let result = args.validate().and_then(|_| {
        let connection = connection::connect(&task.env, &task.config)?;
        let working_copy = Git2WorkingCopy::open(task.working_dir())?;
        execute(args, task, &connection, &ProcessRunner, &working_copy, &SystemClock)
    });

    match result {
        Ok(outcome) => outcome.into(),
        Err(e) => super::failed(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::domain::{IdentityRef, PullRequest, ReleaseContext};
    use crate::error::ReleaseError;
    use crate::git::MockWorkingCopy;
    use crate::host::MockCodeHost;
    use crate::pipeline::{PipelineEnv, TaskResult};
    use crate::release::RecordingClock;
    use crate::runner::MockRunner;
    use std::fs;
    use tempfile::TempDir;

    fn args() -> ReleaseArgs {
        ReleaseArgs {
            beta: true,
            deploy: false,
            merge_into_develop: false,
            force_publish: false,
            dev_branch: "develop".to_string(),
            account: None,
            email: None,
            api_key: None,
            api_token: None,
        }
    }

    fn task(dir: &TempDir) -> TaskConfig {
        let config = Config {
            working_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        let env = PipelineEnv {
            requested_for: "Release Bot".to_string(),
            requested_for_email: "bot@shop.test".to_string(),
            ..PipelineEnv::default()
        };
        TaskConfig::new(config, env)
    }

    fn connection() -> (Connection, MockCodeHost) {
        let pr = PullRequest {
            pull_request_id: 7,
            title: "[patch] Fix totals".to_string(),
            source_ref_name: "refs/heads/fix/totals".to_string(),
            target_ref_name: "refs/heads/main".to_string(),
            created_by: IdentityRef {
                display_name: "Sam Doe".to_string(),
                unique_name: "sam@shop.test".to_string(),
                id: None,
            },
            ..PullRequest::default()
        };
        let host = MockCodeHost::new().with_pull_request(pr.clone());
        let connection = Connection {
            context: ReleaseContext::from_pull_request("repo", "token", &pr),
            host: Box::new(host.clone()),
            pull_request: pr,
            pipeline_url: "https://ci/run".to_string(),
        };
        (connection, host)
    }

    #[test]
    fn test_rejects_placeholder_input() {
        let mut args = args();
        args.api_key = Some("bad".to_string());
        assert!(matches!(args.validate(), Err(ReleaseError::Config(_))));

        let outcome = run(&args, &TaskConfig::new(Config::default(), PipelineEnv::default()));
        assert_eq!(outcome.result, TaskResult::Failed);
        assert!(outcome.message.contains("apiKey"));
    }

    #[test]
    fn test_partial_credentials_skip_login() {
        let mut args = args();
        args.account = Some("shop".to_string());
        assert!(args.credentials().is_none());
    }

    #[test]
    fn test_execute_uses_pipeline_identity() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();
        fs::write(dir.path().join("CHANGELOG.md"), "").unwrap();
        let (connection, _host) = connection();
        let runner = MockRunner::new().succeed_with(
            "projex git release --get-version",
            "app_name:shop.totals,old_version:2.0.0,new_version:2.0.1-beta.0,push:git push",
        );

        let outcome = execute(
            &args(),
            &task(&dir),
            &connection,
            &runner,
            &MockWorkingCopy::new(),
            &RecordingClock::new(),
        )
        .unwrap();

        assert!(matches!(outcome, ReleaseOutcome::Succeeded(_)));
        assert_eq!(runner.count("git config --global user.name \"Release Bot\""), 1);
        assert_eq!(runner.count("git config --global user.email bot@shop.test"), 1);
    }
}
