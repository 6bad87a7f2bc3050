use std::path::Path;

use crate::config::Config;
use crate::domain::{parse_probe_output, VersionInfo};
use crate::error::{ReleaseError, Result};
use crate::notify::{messages, NotificationService};
use crate::release::tool;
use crate::runner::{self, CommandRunner, RunOptions};

/// Ask the release tool for app name, current and next version.
///
/// Any failure (probe command or incomplete output) is reported on the pull
/// request when a notifier is supplied, then returned as a
/// `VersionResolution` error.
pub fn resolve(
    runner: &dyn CommandRunner,
    working_dir: &Path,
    config: &Config,
    beta: bool,
    notifier: Option<&NotificationService<'_>>,
) -> Result<VersionInfo> {
    let result = probe(runner, working_dir, config, beta);

    if let Err(e) = &result {
        log::error!("Version resolution failed: {}", e);
        if let Some(notifier) = notifier {
            notifier.post(&messages::version_failure());
        }
    }
    result
}

fn probe(
    runner: &dyn CommandRunner,
    working_dir: &Path,
    config: &Config,
    beta: bool,
) -> Result<VersionInfo> {
    let step = tool::version_probe(&config.tool, beta);
    let output = runner::run(
        runner,
        &step,
        working_dir,
        &RunOptions::new("Release version resolved")
            .hide_output(true)
            .hide_success_message(true)
            .retries(config.retries.probe),
    )
    .map_err(|e| ReleaseError::version(format!("{} ({})", messages::VERSION_ERROR_RESULT, e)))?;

    log::debug!("Version probe output: {}", output.trim());
    let info = parse_probe_output(&output, config.probe_format)
        .map_err(|e| ReleaseError::version(format!("{} ({})", messages::VERSION_ERROR_RESULT, e)))?;

    log::info!("Resolved {}", info);
    Ok(info)
}
