use std::time::Duration;

use crate::domain::pull_request::heads_ref;
use crate::domain::{NewPullRequest, PullRequest};
use crate::error::{ReleaseError, Result};
use crate::host::CodeHost;
use crate::notify::{messages, NotificationService};
use crate::release::Clock;

/// Open a pull request carrying `origin`'s branch into `target_branch`,
/// wait for the service to settle, then complete it.
///
/// Success and failure are both reported on the originating pull request.
pub fn merge_into(
    host: &dyn CodeHost,
    notifier: &NotificationService<'_>,
    clock: &dyn Clock,
    wait: Duration,
    origin: &PullRequest,
    target_branch: &str,
) -> Result<PullRequest> {
    let target_ref = heads_ref(target_branch);
    let created_by = origin.created_by.display_name.as_str();

    match create_and_complete(host, clock, wait, origin, &target_ref) {
        Ok(created) => {
            log::info!(
                "Pull request {} into {} created and completed",
                created.pull_request_id,
                target_ref
            );
            notifier.post(&messages::pull_request_created(&created, created_by));
            Ok(created)
        }
        Err(e) => {
            log::error!("Error creating pull request into {}: {}", target_ref, e);
            notifier.post(&messages::pull_request_failed(
                &origin.source_ref_name,
                &target_ref,
                &origin.title,
                created_by,
            ));
            Err(ReleaseError::pull_request(format!(
                "Error creating pull request into {}: {}",
                target_ref, e
            )))
        }
    }
}

fn create_and_complete(
    host: &dyn CodeHost,
    clock: &dyn Clock,
    wait: Duration,
    origin: &PullRequest,
    target_ref: &str,
) -> Result<PullRequest> {
    let request = NewPullRequest {
        source_ref_name: origin.source_ref_name.clone(),
        target_ref_name: target_ref.to_string(),
        title: origin.title.clone(),
        description: origin.description().to_string(),
    };

    let created = host.create_pull_request(&request)?;
    clock.sleep(wait);

    // The merge commit is only known once the service has processed the PR.
    let current = host.get_pull_request(created.pull_request_id)?;
    host.complete_pull_request(&current)?;
    Ok(current)
}
