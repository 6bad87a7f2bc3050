//! Authenticated handle to the code-hosting service plus the change-request
//! context of the current run.

use crate::config::Config;
use crate::domain::{PullRequest, ReleaseContext};
use crate::error::{ReleaseError, Result};
use crate::host::{AzureDevOpsClient, CodeHost, HostSettings};
use crate::pipeline::PipelineEnv;

/// Live service handle kept together with the data it was resolved from
pub struct Connection {
    pub context: ReleaseContext,
    pub pull_request: PullRequest,
    pub host: Box<dyn CodeHost>,
    pub pipeline_url: String,
}

impl Connection {
    pub fn pull_request_id(&self) -> i64 {
        self.context.pull_request_id
    }
}

/// Parse the pull request id of the run; absent or negative ids are rejected.
pub fn pull_request_id(env: &PipelineEnv) -> Result<i64> {
    let raw = env.pull_request_id.as_deref().ok_or_else(|| {
        ReleaseError::config("Pull request id not found. This task only runs on pull request builds")
    })?;

    let id: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ReleaseError::config(format!("Invalid pull request id '{}'", raw)))?;

    if id < 0 {
        return Err(ReleaseError::config(format!(
            "Invalid pull request id '{}'",
            raw
        )));
    }
    Ok(id)
}

/// Resolve id and token, open the host through `factory`, then fetch the
/// pull request.
pub fn connect_with<F>(env: &PipelineEnv, config: &Config, factory: F) -> Result<Connection>
where
    F: FnOnce(HostSettings) -> Result<Box<dyn CodeHost>>,
{
    let id = pull_request_id(env)?;
    let token = env
        .access_token
        .clone()
        .ok_or_else(|| ReleaseError::config("Access token not found. Enable SYSTEM_ACCESSTOKEN"))?;

    let settings = HostSettings {
        collection_uri: env.collection_uri.clone(),
        repository_id: env.repository_id.clone(),
        access_token: token.clone(),
        api_version: config.api_version.clone(),
        timeout: config.http_timeout(),
    };

    let host = factory(settings)?;
    let pull_request = host.get_pull_request(id).map_err(|e| {
        ReleaseError::config(format!("Could not fetch pull request {}: {}", id, e))
    })?;
    log::info!(
        "Connected to pull request {}: {}",
        pull_request.pull_request_id,
        pull_request.title
    );

    Ok(Connection {
        context: ReleaseContext::from_pull_request(&env.repository_id, token, &pull_request),
        pull_request,
        host,
        pipeline_url: env.pipeline_url(),
    })
}

/// Connect to the Azure DevOps Git API.
pub fn connect(env: &PipelineEnv, config: &Config) -> Result<Connection> {
    connect_with(env, config, |settings| {
        Ok(Box::new(AzureDevOpsClient::new(settings)?) as Box<dyn CodeHost>)
    })
}
