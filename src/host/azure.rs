use std::fmt;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::domain::{CommitRef, NewPullRequest, PullRequest};
use crate::error::{ReleaseError, Result};
use crate::host::{CodeHost, Label, ThreadHandle};

const BYPASS_REASON: &str = "CI/CD Automated PR merge";

/// Connection settings for the Azure DevOps Git API
#[derive(Clone)]
pub struct HostSettings {
    pub collection_uri: String,
    pub repository_id: String,
    pub access_token: String,
    pub api_version: String,
    pub timeout: Duration,
}

impl fmt::Debug for HostSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostSettings")
            .field("collection_uri", &self.collection_uri)
            .field("repository_id", &self.repository_id)
            .field("access_token", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Deserialize)]
struct ValueList<T> {
    value: Vec<T>,
}

/// Blocking REST client for pull-request operations
pub struct AzureDevOpsClient {
    client: Client,
    base: Url,
    settings: HostSettings,
}

impl AzureDevOpsClient {
    pub fn new(settings: HostSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("pr-release/{}", env!("CARGO_PKG_VERSION")))
            .timeout(settings.timeout)
            .build()?;

        let raw = format!(
            "{}/_apis/git/repositories/{}/",
            settings.collection_uri.trim_end_matches('/'),
            settings.repository_id
        );
        let base = Url::parse(&raw)
            .map_err(|e| ReleaseError::config(format!("Invalid collection URI '{}': {}", raw, e)))?;

        Ok(AzureDevOpsClient {
            client,
            base,
            settings,
        })
    }

    /// Build an endpoint URL; every segment is percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ReleaseError::config("Collection URI cannot be a base URL"))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        url.query_pairs_mut()
            .append_pair("api-version", &self.settings.api_version);
        Ok(url)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.bearer_auth(&self.settings.access_token)
    }

    fn send(&self, builder: RequestBuilder, url: &Url) -> Result<Response> {
        let response = self.authorized(builder).send()?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().unwrap_or_default();
            Err(ReleaseError::Api {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            })
        }
    }

    fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.url(segments)?;
        log::debug!("GET {}", url);
        let response = self.send(self.client.get(url.clone()), &url)?;
        Ok(response.json()?)
    }

    fn pr_segment(pull_request_id: i64) -> String {
        pull_request_id.to_string()
    }
}

impl CodeHost for AzureDevOpsClient {
    fn get_pull_request(&self, pull_request_id: i64) -> Result<PullRequest> {
        self.get_json(&["pullrequests", Self::pr_segment(pull_request_id).as_str()])
    }

    fn create_pull_request(&self, request: &NewPullRequest) -> Result<PullRequest> {
        let url = self.url(&["pullrequests"])?;
        log::debug!("POST {}", url);
        let response = self.send(self.client.post(url.clone()).json(request), &url)?;
        Ok(response.json()?)
    }

    fn complete_pull_request(&self, pull_request: &PullRequest) -> Result<()> {
        let commit = pull_request
            .last_merge_source_commit
            .as_ref()
            .ok_or_else(|| {
                ReleaseError::pull_request(format!(
                    "Pull request {} has no last merge source commit",
                    pull_request.pull_request_id
                ))
            })?;

        let body = json!({
            "status": "completed",
            "lastMergeSourceCommit": { "commitId": commit.commit_id },
            "completionOptions": {
                "bypassPolicy": true,
                "bypassReason": BYPASS_REASON,
                "deleteSourceBranch": true,
                "mergeCommitMessage": pull_request.merge_commit_message(),
            }
        });

        let url = self.url(&[
            "pullrequests",
            Self::pr_segment(pull_request.pull_request_id).as_str(),
        ])?;
        log::debug!("PATCH {}", url);
        self.send(self.client.patch(url.clone()).json(&body), &url)?;
        Ok(())
    }

    fn create_thread(&self, pull_request_id: i64, content: &str) -> Result<ThreadHandle> {
        let body = json!({
            "comments": [
                { "parentCommentId": 0, "content": content, "commentType": "text" }
            ],
            "status": "closed"
        });

        let url = self.url(&[
            "pullRequests",
            Self::pr_segment(pull_request_id).as_str(),
            "threads",
        ])?;
        log::debug!("POST {}", url);
        let response = self.send(self.client.post(url.clone()).json(&body), &url)?;
        Ok(response.json()?)
    }

    fn list_labels(&self, pull_request_id: i64) -> Result<Vec<Label>> {
        let list: ValueList<Label> = self.get_json(&[
            "pullRequests",
            Self::pr_segment(pull_request_id).as_str(),
            "labels",
        ])?;
        Ok(list.value)
    }

    fn add_label(&self, pull_request_id: i64, name: &str) -> Result<()> {
        let url = self.url(&[
            "pullRequests",
            Self::pr_segment(pull_request_id).as_str(),
            "labels",
        ])?;
        log::debug!("POST {}", url);
        self.send(
            self.client.post(url.clone()).json(&json!({ "name": name })),
            &url,
        )?;
        Ok(())
    }

    fn remove_label(&self, pull_request_id: i64, name: &str) -> Result<()> {
        let url = self.url(&[
            "pullRequests",
            Self::pr_segment(pull_request_id).as_str(),
            "labels",
            name,
        ])?;
        log::debug!("DELETE {}", url);
        self.send(self.client.delete(url.clone()), &url)?;
        Ok(())
    }

    /// Deletes every current label by id, then attaches `names`.
    ///
    /// Deleting by id avoids the name lookup, which misbehaves for labels
    /// containing characters such as `:`.
    fn replace_labels(&self, pull_request_id: i64, names: &[String]) -> Result<()> {
        for label in self.list_labels(pull_request_id)? {
            let key = if label.id.is_empty() { &label.name } else { &label.id };
            let url = self.url(&[
                "pullRequests",
                Self::pr_segment(pull_request_id).as_str(),
                "labels",
                key.as_str(),
            ])?;
            log::debug!("DELETE {}", url);
            self.send(self.client.delete(url.clone()), &url)?;
        }

        for name in names {
            self.add_label(pull_request_id, name)?;
        }
        Ok(())
    }

    fn pull_request_commits(&self, pull_request_id: i64) -> Result<Vec<CommitRef>> {
        let list: ValueList<CommitRef> = self.get_json(&[
            "pullRequests",
            Self::pr_segment(pull_request_id).as_str(),
            "commits",
        ])?;
        Ok(list.value)
    }
}
