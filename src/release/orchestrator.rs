use crate::config::{self, Config, LoginCredentials};
use crate::connection::Connection;
use crate::domain::{classify, skip_tags, ReleaseClassification};
use crate::error::Result;
use crate::git::{GitOrchestrator, WorkingCopy};
use crate::notify::{messages, NotificationService};
use crate::release::{propagate, tool, version, Clock, ReleaseMode, ReleaseOutcome, ReleaseStep};
use crate::runner::{self, CommandRunner, CommandStep, RunOptions};
use crate::ui;

/// Author configured for commits made during the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitIdentity {
    pub name: String,
    pub email: String,
}

/// Drives one release run over a connected pull request
///
/// The run is linear. Skips end it early with [ReleaseOutcome::Skipped];
/// any failing step ends it with the step's error after the failure has been
/// reported on the pull request.
pub struct ReleaseOrchestrator<'a> {
    connection: &'a Connection,
    runner: &'a dyn CommandRunner,
    working_copy: &'a dyn WorkingCopy,
    clock: &'a dyn Clock,
    config: &'a Config,
    mode: ReleaseMode,
    identity: GitIdentity,
    login: Option<LoginCredentials>,
}

impl<'a> ReleaseOrchestrator<'a> {
    pub fn new(
        connection: &'a Connection,
        runner: &'a dyn CommandRunner,
        working_copy: &'a dyn WorkingCopy,
        clock: &'a dyn Clock,
        config: &'a Config,
    ) -> Self {
        let author = &connection.context.author;
        ReleaseOrchestrator {
            connection,
            runner,
            working_copy,
            clock,
            config,
            mode: ReleaseMode::default(),
            identity: GitIdentity {
                name: author.display_name.clone(),
                email: author.unique_name.clone(),
            },
            login: None,
        }
    }

    pub fn mode(mut self, mode: ReleaseMode) -> Self {
        self.mode = mode;
        self
    }

    /// Override the commit author; blank values keep the pull request author.
    pub fn identity(mut self, name: &str, email: &str) -> Self {
        if !name.trim().is_empty() {
            self.identity.name = name.to_string();
        }
        if !email.trim().is_empty() {
            self.identity.email = email.to_string();
        }
        self
    }

    pub fn login(mut self, credentials: Option<LoginCredentials>) -> Self {
        self.login = credentials;
        self
    }

    fn enter(&self, step: ReleaseStep) {
        log::info!("[{}] {}", self.connection.pull_request_id(), step);
    }

    /// Report a failed step on the pull request and pass the result through.
    fn guard<T>(
        &self,
        notifier: &NotificationService<'_>,
        step: ReleaseStep,
        result: Result<T>,
    ) -> Result<T> {
        if let Err(e) = &result {
            log::error!("Step {} failed: {}", step, e);
            notifier.post(&messages::command_failure(
                step.name(),
                &self.connection.pipeline_url,
            ));
        }
        result
    }

    fn run_tool(
        &self,
        notifier: &NotificationService<'_>,
        step: ReleaseStep,
        command: CommandStep,
        options: RunOptions,
    ) -> Result<String> {
        self.enter(step);
        let result = runner::run(self.runner, &command, &self.config.working_dir, &options);
        self.guard(notifier, step, result)
    }

    fn commit_summaries(&self) -> Vec<String> {
        match self
            .connection
            .host
            .pull_request_commits(self.connection.pull_request_id())
        {
            Ok(commits) => commits.iter().map(|c| c.summary()).collect(),
            Err(e) => {
                log::warn!("Could not list pull request commits: {}", e);
                Vec::new()
            }
        }
    }

    /// Classify the title and apply the skip tags.
    ///
    /// Skip tags are honoured even when the title has no release tag, since a
    /// skipped run never needs a release kind.
    fn classify(
        &self,
        notifier: &NotificationService<'_>,
    ) -> Result<std::result::Result<ReleaseClassification, ReleaseOutcome>> {
        let title = &self.connection.context.title;

        self.enter(ReleaseStep::Classify);
        let classification = classify(title);
        let skips = skip_tags(title)?;

        self.enter(ReleaseStep::CheckSkips);
        if self.mode.beta && skips.skip_beta {
            log::info!("Beta release skipped by [no-beta]");
            notifier.post(&messages::beta_skipped());
            return Ok(Err(ReleaseOutcome::Skipped(
                messages::BETA_SKIPPED_RESULT.to_string(),
            )));
        }
        if skips.skip_publish {
            log::info!("Publish skipped by [no-publish]");
            notifier.post(&messages::publish_skipped());
            return Ok(Err(ReleaseOutcome::Skipped(
                messages::PUBLISH_SKIPPED_RESULT.to_string(),
            )));
        }

        match classification {
            Ok(c) => Ok(Ok(c.for_channel(self.mode.beta))),
            Err(e) => {
                log::error!("{}", e);
                notifier.post(&messages::classification_failure());
                Err(e)
            }
        }
    }

    /// Execute the release run.
    pub fn run(&self) -> Result<ReleaseOutcome> {
        let notifier = NotificationService::for_connection(self.connection);
        let context = &self.connection.context;
        let pull_request = &self.connection.pull_request;
        let working_dir = self.config.working_dir.as_path();
        let beta = self.mode.beta;
        let retries = &self.config.retries;

        self.enter(ReleaseStep::CheckAppRoot);
        config::check_app_root(working_dir)?;

        let classification = match self.classify(&notifier)? {
            Ok(classification) => classification,
            Err(skipped) => return Ok(skipped),
        };

        if let Some(credentials) = &self.login {
            self.run_tool(
                &notifier,
                ReleaseStep::Login,
                tool::login(&self.config.tool, credentials),
                RunOptions::new("Logged in to the release tool")
                    .hide_output(true)
                    .retries(retries.publish),
            )?;
        }

        self.enter(ReleaseStep::ResolveVersion);
        let version = version::resolve(self.runner, working_dir, self.config, beta, Some(&notifier))?;
        ui::display_version_change(&version.app_name, &version.old_version, &version.new_version);

        let git = GitOrchestrator::new(self.runner, self.working_copy, working_dir, retries.git);

        self.enter(ReleaseStep::SetGitIdentity);
        self.guard(
            &notifier,
            ReleaseStep::SetGitIdentity,
            git.set_identity(&self.identity.name, &self.identity.email),
        )?;

        self.enter(ReleaseStep::CheckoutSource);
        self.guard(
            &notifier,
            ReleaseStep::CheckoutSource,
            git.checkout_source(&context.source_ref),
        )?;

        self.enter(ReleaseStep::NotifyStart);
        let commits = self.commit_summaries();
        ui::display_commit_list(&commits, context.pull_request_id);
        notifier.post(&messages::publish_start(
            beta,
            &version,
            &self.connection.pipeline_url,
            &commits,
        ));

        if !beta {
            self.enter(ReleaseStep::CompletePullRequest);
            if let Err(e) = git.complete_and_merge(self.connection.host.as_ref(), pull_request) {
                log::error!("{}", e);
                notifier.post(&messages::pull_request_completion_failed(pull_request));
                return Err(e);
            }

            self.enter(ReleaseStep::WaitAfterComplete);
            self.clock.sleep(self.config.consistency_wait());

            self.enter(ReleaseStep::CheckoutTarget);
            self.guard(
                &notifier,
                ReleaseStep::CheckoutTarget,
                git.checkout_source(&context.target_ref),
            )?;
        }

        self.run_tool(
            &notifier,
            ReleaseStep::UpdateChangelog,
            tool::changelog(&self.config.tool, &classification, beta),
            RunOptions::new("Changelog updated").retries(retries.publish),
        )?;

        self.run_tool(
            &notifier,
            ReleaseStep::Publish,
            tool::publish(&self.config.tool, self.mode.force_publish),
            RunOptions::new("App published").retries(retries.publish),
        )?;

        if self.mode.deploy {
            self.run_tool(
                &notifier,
                ReleaseStep::Deploy,
                tool::deploy(&self.config.tool),
                RunOptions::new("App deployed").retries(retries.publish),
            )?;
        }

        self.enter(ReleaseStep::ResetHard);
        self.guard(&notifier, ReleaseStep::ResetHard, git.reset_hard())?;

        if beta && self.mode.merge_into_develop {
            self.enter(ReleaseStep::MergeIntoDevelop);
            propagate::merge_into(
                self.connection.host.as_ref(),
                &notifier,
                self.clock,
                self.config.consistency_wait(),
                pull_request,
                &self.mode.dev_branch,
            )?;
        }

        self.enter(ReleaseStep::NotifySuccess);
        let message = if self.mode.deploy {
            messages::deploy_success(&version)
        } else {
            messages::publish_success(beta, &version, &self.connection.pipeline_url)
        };
        notifier.post(&message);

        let summary = format!(
            "{} {} published: {} -> {}",
            if beta { "Beta of" } else { "Release of" },
            version.app_name,
            version.old_version,
            version.new_version
        );
        ui::display_success(&summary);
        Ok(ReleaseOutcome::Succeeded(summary))
    }
}
