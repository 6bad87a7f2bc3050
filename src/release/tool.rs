//! Invocations of the external release tool.

use crate::config::LoginCredentials;
use crate::domain::ReleaseClassification;
use crate::runner::{CommandSpec, CommandStep};

pub const STEP_LOGIN: &str = "login";
pub const STEP_PROBE: &str = "version-probe";
pub const STEP_CHANGELOG: &str = "changelog";
pub const STEP_PUBLISH: &str = "publish";
pub const STEP_DEPLOY: &str = "deploy";
pub const STEP_SUGGEST_LABELS: &str = "suggest-labels";

fn qualifier(beta: bool) -> Option<&'static str> {
    if beta {
        None
    } else {
        Some("stable")
    }
}

/// `<tool> vtex login <account> <email> master <apiKey> <apiToken>`
pub fn login(tool: &str, credentials: &LoginCredentials) -> CommandStep {
    CommandStep::single(
        STEP_LOGIN,
        CommandSpec::new(tool).args([
            "vtex",
            "login",
            credentials.account.as_str(),
            credentials.email.as_str(),
            "master",
            credentials.api_key.as_str(),
            credentials.api_token.as_str(),
        ]),
    )
}

/// `<tool> git release [stable] --get-version`
pub fn version_probe(tool: &str, beta: bool) -> CommandStep {
    let mut command = CommandSpec::new(tool).args(["git", "release"]);
    if let Some(q) = qualifier(beta) {
        command = command.arg(q);
    }
    CommandStep::single(STEP_PROBE, command.arg("--get-version"))
}

/// Update the changelog and manifest without committing, tagging or pushing.
pub fn changelog(tool: &str, classification: &ReleaseClassification, beta: bool) -> CommandStep {
    let mut command = CommandSpec::new(tool)
        .args(["git", "release"])
        .arg(classification.release_kind.as_str());
    if let Some(q) = qualifier(beta) {
        command = command.arg(q);
    }
    CommandStep::single(
        STEP_CHANGELOG,
        command.arg(classification.changelog_section.as_str()).args([
            "--yes",
            "--no-deploy",
            "--no-push",
            "--no-check-release",
            "--no-tag",
        ]),
    )
}

fn vtex_run(tool: &str, inner: String) -> CommandSpec {
    CommandSpec::new(tool)
        .args(["vtex", "run"])
        .arg(inner)
        .arg("--verbose")
}

/// `<tool> vtex run "vtex publish -y [--force] --verbose" --verbose`
pub fn publish(tool: &str, force: bool) -> CommandStep {
    let inner = if force {
        "vtex publish -y --force --verbose"
    } else {
        "vtex publish -y --verbose"
    };
    CommandStep::single(STEP_PUBLISH, vtex_run(tool, inner.to_string()))
}

/// `<tool> vtex run "vtex deploy -y --force --verbose" --verbose`
pub fn deploy(tool: &str) -> CommandStep {
    CommandStep::single(
        STEP_DEPLOY,
        vtex_run(tool, "vtex deploy -y --force --verbose".to_string()),
    )
}

/// `<tool> pull-request labels suggest --format csv`
pub fn suggest_labels(tool: &str) -> CommandStep {
    CommandStep::single(
        STEP_SUGGEST_LABELS,
        CommandSpec::new(tool).args(["pull-request", "labels", "suggest", "--format", "csv"]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::classify;

    #[test]
    fn test_version_probe_qualifier() {
        assert_eq!(
            version_probe("projex", false).to_string(),
            "projex git release stable --get-version"
        );
        assert_eq!(
            version_probe("projex", true).to_string(),
            "projex git release --get-version"
        );
    }

    #[test]
    fn test_changelog_argv() {
        let classification = classify("[changed] Rework checkout").unwrap();
        assert_eq!(
            changelog("projex", &classification, false).commands[0].args,
            vec![
                "git",
                "release",
                "minor",
                "stable",
                "Changed",
                "--yes",
                "--no-deploy",
                "--no-push",
                "--no-check-release",
                "--no-tag"
            ]
        );
    }

    #[test]
    fn test_beta_changelog_is_prerelease() {
        let classification = classify("[major] New API").unwrap().for_channel(true);
        assert_eq!(
            changelog("projex", &classification, true).to_string(),
            "projex git release prerelease Added --yes --no-deploy --no-push --no-check-release --no-tag"
        );
    }

    #[test]
    fn test_publish_inner_command_is_one_argument() {
        let step = publish("projex", true);
        assert_eq!(
            step.commands[0].args,
            vec!["vtex", "run", "vtex publish -y --force --verbose", "--verbose"]
        );
        assert_eq!(
            publish("projex", false).to_string(),
            "projex vtex run \"vtex publish -y --verbose\" --verbose"
        );
    }

    #[test]
    fn test_login_argv() {
        let creds = LoginCredentials {
            account: "shop".to_string(),
            email: "ci@shop.test".to_string(),
            api_key: "key".to_string(),
            api_token: "token".to_string(),
        };
        assert_eq!(
            login("projex", &creds).commands[0].args,
            vec!["vtex", "login", "shop", "ci@shop.test", "master", "key", "token"]
        );
    }
}
