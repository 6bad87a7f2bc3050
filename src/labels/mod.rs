//! Label reconciliation
//!
//! Brings the labels of a pull request in line with a suggested set. Single
//! label failures are logged and skipped; they never abort the batch.

use std::path::Path;

use crate::config::Config;
use crate::domain::label::{
    apply_operations, merge_custom_labels, parse_suggested_labels, plan_label_operations,
};
use crate::domain::{LabelAction, LabelOperation};
use crate::error::{ReleaseError, Result};
use crate::host::CodeHost;
use crate::release::tool;
use crate::runner::{self, CommandRunner, RunOptions};
use crate::ui;

/// What a reconciliation planned and applied
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelReport {
    pub operations: Vec<LabelOperation>,
    pub dry_run: bool,
    pub added: usize,
    pub removed: usize,
    pub failed: Vec<LabelOperation>,
}

impl LabelReport {
    /// Task result message.
    pub fn message(&self) -> String {
        if self.operations.is_empty() {
            return "Pull request labels are already up to date".to_string();
        }

        if self.dry_run {
            let planned: Vec<String> = self.operations.iter().map(|op| op.to_string()).collect();
            return format!(
                "Dry run completed. Would perform {} label operations: {}",
                self.operations.len(),
                planned.join(", ")
            );
        }

        let mut message = format!(
            "Successfully updated pull request labels: {} added, {} removed",
            self.added, self.removed
        );
        if !self.failed.is_empty() {
            message.push_str(&format!(" ({} failed)", self.failed.len()));
        }
        message
    }
}

/// Suggested labels from the release tool merged with `custom` labels.
pub fn suggest(
    runner: &dyn CommandRunner,
    working_dir: &Path,
    config: &Config,
    custom: &str,
) -> Result<Vec<String>> {
    let output = runner::run(
        runner,
        &tool::suggest_labels(&config.tool),
        working_dir,
        &RunOptions::new("Successfully got suggested labels").hide_output(true),
    )?;
    log::debug!("Label suggestion output: {}", output.trim());

    let suggested = parse_suggested_labels(&output);
    let merged = merge_custom_labels(&suggested, custom);
    log::info!("Suggested labels: [{}]", merged.join(", "));
    Ok(merged)
}

/// Reconcile the labels of `pull_request_id` with `suggested`.
///
/// When any removal is needed the whole set is replaced in one go, falling
/// back to single operations if the bulk replacement fails. With `dry_run`
/// nothing is changed on the service.
pub fn reconcile(
    host: &dyn CodeHost,
    pull_request_id: i64,
    suggested: &[String],
    remove_outdated: bool,
    dry_run: bool,
) -> Result<LabelReport> {
    let current: Vec<String> = host
        .list_labels(pull_request_id)
        .map_err(|e| {
            ReleaseError::label(format!(
                "Could not list labels of pull request {}: {}",
                pull_request_id, e
            ))
        })?
        .into_iter()
        .map(|label| label.name)
        .collect();
    log::info!("Current labels: [{}]", current.join(", "));

    let operations = plan_label_operations(&current, suggested, remove_outdated);
    let mut report = LabelReport {
        operations: operations.clone(),
        dry_run,
        ..LabelReport::default()
    };

    if operations.is_empty() {
        log::info!("No label changes needed");
        return Ok(report);
    }

    ui::display_label_plan(&operations);
    if dry_run {
        ui::display_status("Dry run mode - no changes will be made");
        return Ok(report);
    }

    let needs_removal = operations
        .iter()
        .any(|op| op.action == LabelAction::Remove);

    let mut pending = operations.clone();
    if needs_removal {
        let desired = apply_operations(&current, &operations);
        match host.replace_labels(pull_request_id, &desired) {
            Ok(()) => {
                count(&mut report, &operations);
                return Ok(report);
            }
            Err(e) => {
                log::warn!("Bulk label replacement failed, applying one by one: {}", e);
                pending = replan(host, pull_request_id, suggested, remove_outdated, pending);
            }
        }
    }

    for op in &pending {
        let result = match op.action {
            LabelAction::Add => host.add_label(pull_request_id, &op.label),
            LabelAction::Remove => host.remove_label(pull_request_id, &op.label),
        };
        match result {
            Ok(()) => count(&mut report, std::slice::from_ref(op)),
            Err(e) => {
                log::warn!("Failed to {} label '{}': {}", op.action.name(), op.label, e);
                ui::display_warning(&format!("Skipped {}", op));
                report.failed.push(op.clone());
            }
        }
    }

    Ok(report)
}

/// Plan again from the labels the service holds now.
///
/// A failed bulk replacement may have removed labels before it stopped.
fn replan(
    host: &dyn CodeHost,
    pull_request_id: i64,
    suggested: &[String],
    remove_outdated: bool,
    stale: Vec<LabelOperation>,
) -> Vec<LabelOperation> {
    match host.list_labels(pull_request_id) {
        Ok(labels) => {
            let fresh: Vec<String> = labels.into_iter().map(|label| label.name).collect();
            log::info!("Labels after failed replacement: [{}]", fresh.join(", "));
            plan_label_operations(&fresh, suggested, remove_outdated)
        }
        Err(e) => {
            log::warn!("Could not list labels again, using the original plan: {}", e);
            stale
        }
    }
}

fn count(report: &mut LabelReport, operations: &[LabelOperation]) {
    for op in operations {
        match op.action {
            LabelAction::Add => report.added += 1,
            LabelAction::Remove => report.removed += 1,
        }
    }
}
