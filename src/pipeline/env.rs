use std::fmt;

/// Pipeline variables consumed by the tasks, read once at process entry.
///
/// The agent exposes pipeline variables as upper-cased environment variables
/// with dots replaced by underscores (`System.CollectionUri` becomes
/// `SYSTEM_COLLECTIONURI`).
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PipelineEnv {
    pub collection_uri: String,
    pub team_project: String,
    pub build_id: String,
    pub repository_id: String,
    /// Raw `System.PullRequest.PullRequestId`; validated by the connection provider
    pub pull_request_id: Option<String>,
    pub requested_for: String,
    pub requested_for_email: String,
    pub source_branch: String,
    pub access_token: Option<String>,
}

impl PipelineEnv {
    /// Read the pipeline variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the pipeline variables through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).unwrap_or_default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        PipelineEnv {
            collection_uri: get("SYSTEM_COLLECTIONURI"),
            team_project: get("SYSTEM_TEAMPROJECT"),
            build_id: get("BUILD_BUILDID"),
            repository_id: get("BUILD_REPOSITORY_ID"),
            pull_request_id: non_empty("SYSTEM_PULLREQUEST_PULLREQUESTID"),
            requested_for: get("BUILD_REQUESTEDFOR"),
            requested_for_email: get("BUILD_REQUESTEDFOREMAIL"),
            source_branch: get("BUILD_SOURCEBRANCH"),
            access_token: non_empty("SYSTEM_ACCESSTOKEN"),
        }
    }

    /// Link to the build results page of the current run.
    pub fn pipeline_url(&self) -> String {
        format!(
            "{}{}/_build/results?buildId={}",
            self.collection_uri, self.team_project, self.build_id
        )
    }
}

impl fmt::Debug for PipelineEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineEnv")
            .field("collection_uri", &self.collection_uri)
            .field("team_project", &self.team_project)
            .field("build_id", &self.build_id)
            .field("repository_id", &self.repository_id)
            .field("pull_request_id", &self.pull_request_id)
            .field("requested_for", &self.requested_for)
            .field("requested_for_email", &self.requested_for_email)
            .field("source_branch", &self.source_branch)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_reads_all_variables() {
        let env = PipelineEnv::from_lookup(lookup_from(&[
            ("SYSTEM_COLLECTIONURI", "https://dev.azure.com/shop/"),
            ("SYSTEM_TEAMPROJECT", "storefront"),
            ("BUILD_BUILDID", "812"),
            ("BUILD_REPOSITORY_ID", "repo-guid"),
            ("SYSTEM_PULLREQUEST_PULLREQUESTID", "42"),
            ("BUILD_REQUESTEDFOR", "Sam Doe"),
            ("BUILD_REQUESTEDFOREMAIL", "sam@shop.test"),
            ("BUILD_SOURCEBRANCH", "refs/heads/feature/cart"),
            ("SYSTEM_ACCESSTOKEN", "secret"),
        ]));

        assert_eq!(env.repository_id, "repo-guid");
        assert_eq!(env.pull_request_id.as_deref(), Some("42"));
        assert_eq!(env.access_token.as_deref(), Some("secret"));
        assert_eq!(
            env.pipeline_url(),
            "https://dev.azure.com/shop/storefront/_build/results?buildId=812"
        );
    }

    #[test]
    fn test_blank_token_is_absent() {
        let env = PipelineEnv::from_lookup(lookup_from(&[("SYSTEM_ACCESSTOKEN", "  ")]));
        assert!(env.access_token.is_none());
        assert!(env.pull_request_id.is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let env = PipelineEnv {
            access_token: Some("super-secret".to_string()),
            ..PipelineEnv::default()
        };
        let debug = format!("{:?}", env);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
