use serde::{Deserialize, Serialize};

const HEADS_PREFIX: &str = "refs/heads/";

/// Strip the `refs/heads/` prefix from a ref name, if present.
pub fn branch_name(ref_name: &str) -> &str {
    ref_name.strip_prefix(HEADS_PREFIX).unwrap_or(ref_name)
}

/// Build a full `refs/heads/<branch>` ref name from a branch name or ref.
pub fn heads_ref(branch: &str) -> String {
    format!("{}{}", HEADS_PREFIX, branch_name(branch))
}

/// Identity of a user on the code-hosting service
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: String,
    /// Usually the user's e-mail address
    #[serde(default)]
    pub unique_name: String,
}

/// Reference to a commit as returned by the service
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRef {
    pub commit_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl CommitRef {
    /// `<id> <first line of message>`
    pub fn summary(&self) -> String {
        let message = self
            .comment
            .as_deref()
            .and_then(|c| c.lines().next())
            .unwrap_or("");
        format!("{} {}", self.commit_id, message).trim_end().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryRef {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
}

/// An open change request on the code-hosting service
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub pull_request_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub source_ref_name: String,
    pub target_ref_name: String,
    #[serde(default)]
    pub created_by: IdentityRef,
    #[serde(default)]
    pub last_merge_source_commit: Option<CommitRef>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub repository: Option<RepositoryRef>,
}

impl PullRequest {
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Web URL of the pull request page, when the service reported one.
    pub fn web_url(&self) -> Option<String> {
        self.repository
            .as_ref()
            .and_then(|repo| repo.web_url.as_ref())
            .map(|url| format!("{}/pullrequest/{}", url, self.pull_request_id))
    }

    /// Commit message used when the service completes the merge.
    pub fn merge_commit_message(&self) -> String {
        format!(
            "Merged PR {}: {} \n {}",
            self.pull_request_id,
            self.title,
            self.description()
        )
    }
}

/// Fields needed to open a new pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPullRequest {
    pub source_ref_name: String,
    pub target_ref_name: String,
    pub title: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_name_strips_heads_prefix() {
        assert_eq!(branch_name("refs/heads/feature/cart"), "feature/cart");
        assert_eq!(branch_name("develop"), "develop");
    }

    #[test]
    fn test_heads_ref_is_idempotent() {
        assert_eq!(heads_ref("develop"), "refs/heads/develop");
        assert_eq!(heads_ref("refs/heads/develop"), "refs/heads/develop");
    }

    #[test]
    fn test_deserialize_service_payload() {
        let json = r#"{
            "pullRequestId": 42,
            "title": "[minor] Add cart feature",
            "description": null,
            "sourceRefName": "refs/heads/feature/cart",
            "targetRefName": "refs/heads/main",
            "createdBy": { "displayName": "Sam Doe", "uniqueName": "sam@shop.test" },
            "lastMergeSourceCommit": { "commitId": "abc123" },
            "repository": { "id": "r1", "webUrl": "https://dev.azure.com/shop/_git/store" },
            "unknownField": true
        }"#;

        let pr: PullRequest = serde_json::from_str(json).unwrap();
        assert_eq!(pr.pull_request_id, 42);
        assert_eq!(pr.description(), "");
        assert_eq!(pr.created_by.unique_name, "sam@shop.test");
        assert_eq!(
            pr.web_url().as_deref(),
            Some("https://dev.azure.com/shop/_git/store/pullrequest/42")
        );
    }

    #[test]
    fn test_merge_commit_message() {
        let pr = PullRequest {
            pull_request_id: 7,
            title: "[patch] Fix price rounding".to_string(),
            description: Some("Rounds half up".to_string()),
            ..PullRequest::default()
        };
        assert_eq!(
            pr.merge_commit_message(),
            "Merged PR 7: [patch] Fix price rounding \n Rounds half up"
        );
    }

    #[test]
    fn test_commit_summary_uses_first_line() {
        let commit = CommitRef {
            commit_id: "abc123".to_string(),
            comment: Some("fix: rounding\n\nlong body".to_string()),
        };
        assert_eq!(commit.summary(), "abc123 fix: rounding");
    }
}
