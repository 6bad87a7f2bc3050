use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::{CommitRef, NewPullRequest, PullRequest, RepositoryRef};
use crate::error::{ReleaseError, Result};
use crate::host::{CodeHost, Label, ThreadHandle};

#[derive(Default)]
struct State {
    pull_requests: HashMap<i64, PullRequest>,
    labels: HashMap<i64, Vec<String>>,
    commits: HashMap<i64, Vec<CommitRef>>,
    threads: Vec<(i64, String)>,
    calls: Vec<String>,
    next_id: i64,
    fail_threads: bool,
    fail_create: bool,
    fail_complete: bool,
    fail_replace: bool,
    clear_on_failed_replace: bool,
    fail_commits: bool,
    failing_labels: Vec<String>,
}

/// In-memory code host for testing without network access
///
/// Every operation is appended to a call log (`"complete 42"`,
/// `"thread 42"`, ...) so tests can assert on ordering. Clones share state,
/// so a test can keep a handle after boxing one into a connection.
#[derive(Clone)]
pub struct MockCodeHost {
    state: Arc<Mutex<State>>,
}

impl MockCodeHost {
    /// Create an empty mock host
    pub fn new() -> Self {
        MockCodeHost {
            state: Arc::new(Mutex::new(State {
                next_id: 1000,
                ..State::default()
            })),
        }
    }

    /// Register a pull request
    pub fn with_pull_request(self, pull_request: PullRequest) -> Self {
        self.lock()
            .pull_requests
            .insert(pull_request.pull_request_id, pull_request);
        self
    }

    /// Set the labels currently attached to a pull request
    pub fn with_labels(self, pull_request_id: i64, labels: &[&str]) -> Self {
        self.lock().labels.insert(
            pull_request_id,
            labels.iter().map(|l| l.to_string()).collect(),
        );
        self
    }

    /// Set the commits of a pull request
    pub fn with_commits(self, pull_request_id: i64, commits: Vec<CommitRef>) -> Self {
        self.lock().commits.insert(pull_request_id, commits);
        self
    }

    /// Make thread creation fail
    pub fn failing_threads(self) -> Self {
        self.lock().fail_threads = true;
        self
    }

    /// Make pull request creation fail
    pub fn failing_create(self) -> Self {
        self.lock().fail_create = true;
        self
    }

    /// Make pull request completion fail
    pub fn failing_complete(self) -> Self {
        self.lock().fail_complete = true;
        self
    }

    /// Make bulk label replacement fail
    pub fn failing_replace(self) -> Self {
        self.lock().fail_replace = true;
        self
    }

    /// Make bulk label replacement drop every label before failing
    pub fn clearing_failed_replace(self) -> Self {
        {
            let mut state = self.lock();
            state.fail_replace = true;
            state.clear_on_failed_replace = true;
        }
        self
    }

    /// Make listing pull request commits fail
    pub fn failing_commits(self) -> Self {
        self.lock().fail_commits = true;
        self
    }

    /// Make single add/remove operations on `label` fail
    pub fn failing_label(self, label: &str) -> Self {
        self.lock().failing_labels.push(label.to_string());
        self
    }

    /// Thread contents posted so far, as `(pull request id, content)`
    pub fn threads(&self) -> Vec<(i64, String)> {
        self.lock().threads.clone()
    }

    /// Log of every call made against the host
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Current label names of a pull request
    pub fn labels(&self, pull_request_id: i64) -> Vec<String> {
        self.lock()
            .labels
            .get(&pull_request_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Stored state of a pull request
    pub fn pull_request(&self, pull_request_id: i64) -> Option<PullRequest> {
        self.lock().pull_requests.get(&pull_request_id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for MockCodeHost {
    fn default() -> Self {
        Self::new()
    }
}

fn api_error(what: &str, status: u16) -> ReleaseError {
    ReleaseError::Api {
        url: format!("mock://{}", what),
        status,
        body: format!("{} rejected by mock host", what),
    }
}

impl CodeHost for MockCodeHost {
    fn get_pull_request(&self, pull_request_id: i64) -> Result<PullRequest> {
        let mut state = self.lock();
        state.calls.push(format!("get {}", pull_request_id));
        state
            .pull_requests
            .get(&pull_request_id)
            .cloned()
            .ok_or_else(|| api_error("pull request", 404))
    }

    fn create_pull_request(&self, request: &NewPullRequest) -> Result<PullRequest> {
        let mut state = self.lock();
        state.calls.push(format!("create {}", request.target_ref_name));
        if state.fail_create {
            return Err(api_error("create pull request", 409));
        }

        state.next_id += 1;
        let pull_request = PullRequest {
            pull_request_id: state.next_id,
            title: request.title.clone(),
            description: Some(request.description.clone()),
            source_ref_name: request.source_ref_name.clone(),
            target_ref_name: request.target_ref_name.clone(),
            last_merge_source_commit: Some(CommitRef {
                commit_id: format!("merge-{}", state.next_id),
                comment: None,
            }),
            status: Some("active".to_string()),
            repository: Some(RepositoryRef {
                id: "mock-repo".to_string(),
                web_url: Some("https://mock.host/_git/repo".to_string()),
            }),
            ..PullRequest::default()
        };
        state
            .pull_requests
            .insert(pull_request.pull_request_id, pull_request.clone());
        Ok(pull_request)
    }

    fn complete_pull_request(&self, pull_request: &PullRequest) -> Result<()> {
        let mut state = self.lock();
        state
            .calls
            .push(format!("complete {}", pull_request.pull_request_id));
        if state.fail_complete {
            return Err(api_error("complete pull request", 400));
        }
        if let Some(stored) = state.pull_requests.get_mut(&pull_request.pull_request_id) {
            stored.status = Some("completed".to_string());
        }
        Ok(())
    }

    fn create_thread(&self, pull_request_id: i64, content: &str) -> Result<ThreadHandle> {
        let mut state = self.lock();
        state.calls.push(format!("thread {}", pull_request_id));
        if state.fail_threads {
            return Err(api_error("thread", 500));
        }
        state.threads.push((pull_request_id, content.to_string()));
        Ok(ThreadHandle {
            id: state.threads.len() as i64,
        })
    }

    fn list_labels(&self, pull_request_id: i64) -> Result<Vec<Label>> {
        let mut state = self.lock();
        state.calls.push(format!("labels {}", pull_request_id));
        Ok(state
            .labels
            .get(&pull_request_id)
            .map(|names| {
                names
                    .iter()
                    .enumerate()
                    .map(|(i, name)| Label {
                        id: format!("label-{}", i),
                        name: name.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn add_label(&self, pull_request_id: i64, name: &str) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(format!("add-label {} {}", pull_request_id, name));
        if state.failing_labels.iter().any(|l| l == name) {
            return Err(api_error("add label", 400));
        }
        let labels = state.labels.entry(pull_request_id).or_default();
        if !labels.iter().any(|l| l == name) {
            labels.push(name.to_string());
        }
        Ok(())
    }

    fn remove_label(&self, pull_request_id: i64, name: &str) -> Result<()> {
        let mut state = self.lock();
        state
            .calls
            .push(format!("remove-label {} {}", pull_request_id, name));
        if state.failing_labels.iter().any(|l| l == name) {
            return Err(api_error("remove label", 404));
        }
        state
            .labels
            .entry(pull_request_id)
            .or_default()
            .retain(|l| l != name);
        Ok(())
    }

    fn replace_labels(&self, pull_request_id: i64, names: &[String]) -> Result<()> {
        let mut state = self.lock();
        state
            .calls
            .push(format!("replace-labels {} {}", pull_request_id, names.join(",")));
        if state.fail_replace {
            if state.clear_on_failed_replace {
                state.labels.insert(pull_request_id, Vec::new());
            }
            return Err(api_error("replace labels", 500));
        }
        state.labels.insert(pull_request_id, names.to_vec());
        Ok(())
    }

    fn pull_request_commits(&self, pull_request_id: i64) -> Result<Vec<CommitRef>> {
        let mut state = self.lock();
        state.calls.push(format!("commits {}", pull_request_id));
        if state.fail_commits {
            return Err(api_error("commits", 500));
        }
        Ok(state
            .commits
            .get(&pull_request_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_then_complete() {
        let host = MockCodeHost::new();
        let created = host
            .create_pull_request(&NewPullRequest {
                source_ref_name: "refs/heads/main".to_string(),
                target_ref_name: "refs/heads/develop".to_string(),
                title: "[minor] Add cart".to_string(),
                description: String::new(),
            })
            .unwrap();

        host.complete_pull_request(&created).unwrap();
        let stored = host.pull_request(created.pull_request_id).unwrap();
        assert_eq!(stored.status.as_deref(), Some("completed"));
        assert_eq!(
            host.calls(),
            vec![
                "create refs/heads/develop".to_string(),
                format!("complete {}", created.pull_request_id)
            ]
        );
    }

    #[test]
    fn test_failing_threads() {
        let host = MockCodeHost::new().failing_threads();
        assert!(host.create_thread(1, "hello").is_err());
        assert!(host.threads().is_empty());
    }

    #[test]
    fn test_label_operations() {
        let host = MockCodeHost::new().with_labels(5, &["bug"]);
        host.add_label(5, "feature").unwrap();
        host.remove_label(5, "bug").unwrap();
        assert_eq!(host.labels(5), vec!["feature".to_string()]);
    }
}
