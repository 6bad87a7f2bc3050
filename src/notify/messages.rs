use crate::domain::{PullRequest, VersionInfo};
use crate::notify::{code, one_line_code};

const GREETING: &str = "Hi there! 👋 I'm the CI/CD Bot, and I'm here to assist you! 🤖";

/// Task result message when the title carries `[no-publish]`.
pub const PUBLISH_SKIPPED_RESULT: &str =
    "Publish process ignored because of the title of the pull request have [no-publish]";

/// Task result message when a beta run meets `[no-beta]`.
pub const BETA_SKIPPED_RESULT: &str =
    "Beta release ignored because of the title of the pull request have [no-beta]";

/// Task result message when the probe output is incomplete.
pub const VERSION_ERROR_RESULT: &str = "Could not get release version. Please make sure you have the correct configuration in the package.json or manifest.json file.";

fn install_command(version: &VersionInfo) -> String {
    code(
        &format!("vtex install {}@{}", version.app_name, version.new_version),
        "bash",
    )
}

fn version_line(version: &VersionInfo) -> String {
    format!(
        "version: **{} :arrow_right: {}**",
        version.old_version, version.new_version
    )
}

/// Posted once the version is known and the source branch is checked out.
pub fn publish_start(
    beta: bool,
    version: &VersionInfo,
    pipeline_url: &str,
    commits: &[String],
) -> String {
    let headline = if beta {
        "Your **Beta** app is being published 📦"
    } else {
        "Your app is being published! 📦"
    };

    let mut message = format!(
        "{}\n{}\n\nYou can check the execution of the build pipeline by following this.\n\n<a href=\"{}\">pipeline link</a>\n",
        headline,
        version_line(version),
        pipeline_url
    );

    if !commits.is_empty() {
        message.push_str("\n**Commits:**\n");
        for commit in commits.iter().take(10) {
            message.push_str(&format!("- {}\n", one_line_code(commit)));
        }
        if commits.len() > 10 {
            message.push_str(&format!("- ... and {} more\n", commits.len() - 10));
        }
    }

    message.push_str("\nHappy build 😉!");
    message
}

/// Posted after the publish command succeeded.
///
/// A pre-release version is announced as a beta even on a stable run.
pub fn publish_success(beta: bool, version: &VersionInfo, pipeline_url: &str) -> String {
    if beta || version.is_prerelease() {
        return format!(
            "Your App in **Beta** is successfully published. :rocket:\n{}\n\nYou can proceed with the installation in your workspace by running the following command:\n\n{}\n\nYou can check the execution of the build pipeline by following this <a href=\"{}\">link</a>.\n\nHappy testing 😉!",
            version_line(version),
            install_command(version),
            pipeline_url
        );
    }

    let deploy = code(
        &format!("vtex deploy {}@{}", version.app_name, version.new_version),
        "bash",
    );
    format!(
        "Your app has been successfully published! :rocket:\n{}\n\nOnce the A/B tests have been performed with the new version, you can proceed with deploying your release by running the following command:\n\n{}\n\nOr you can install the new version in your workspace by running the following command:\n\n{}\n\nAfter the deployment, your app will be updated on all accounts.\n\nHappy testing and deploying! :tada:",
        version_line(version),
        deploy,
        install_command(version)
    )
}

/// Posted after publish and deploy both succeeded.
pub fn deploy_success(version: &VersionInfo) -> String {
    format!(
        "✅ App published and deployed: **{} → {}**\n\nInstall in your workspace:\n{}",
        version.old_version,
        version.new_version,
        install_command(version)
    )
}

/// Format guidance posted when the title has no release tag.
pub fn classification_failure() -> String {
    format!(
        "{}\n\n🚨 Please add a title to the pull request with the following format:\n\n> example: **[minor] Merge feature/branch into develop**\n\nAccepted tags: {}, {}, {}, {}. Add {} or {} to skip those steps.\n\nThank you! 🙏",
        GREETING,
        one_line_code("[major]"),
        one_line_code("[minor]"),
        one_line_code("[changed]"),
        one_line_code("[patch]"),
        one_line_code("[no-beta]"),
        one_line_code("[no-publish]")
    )
}

pub fn version_failure() -> String {
    format!(
        "{}\n\n🚨 It seems that there was an error while attempting to get the release version. Please check the logs and address the issue as soon as possible.\n\nThank you! 🙏",
        GREETING
    )
}

/// Posted when a git or release-tool command exhausted its retries.
pub fn command_failure(step: &str, pipeline_url: &str) -> String {
    format!(
        "{}\n\n🚨 It seems that there was an error while running the {} step. Please check the logs and address the issue as soon as possible.\n\n<a href=\"{}\">pipeline link</a>\n\nThank you! 🙏",
        GREETING,
        one_line_code(step),
        pipeline_url
    )
}

fn details(source_ref: &str, target_ref: &str, title: &str, created_by: &str) -> String {
    format!(
        "**Pull Request Details:**\n- **Source Branch:** {}\n- **Target Branch:** {}\n- **Title:** {}\n- **Created by:** {}",
        one_line_code(source_ref),
        one_line_code(target_ref),
        one_line_code(title),
        one_line_code(created_by)
    )
}

pub fn pull_request_created(created: &PullRequest, created_by: &str) -> String {
    let link = created
        .web_url()
        .map(|url| {
            format!(
                "<a href=\"{}\" target=\"_blank\">Click here to view the pull request</a>\n\n",
                url
            )
        })
        .unwrap_or_default();

    format!(
        "Hi there! 👋 I'm the CI/CD Bot, and I'm excited to inform you that the pull request has been created successfully! 🎉\n\nYour changes have been submitted for review. If you need further assistance or have any questions, feel free to reach out to the development team.\n\n{}{}\n\nThank you for your contribution! 🙌",
        link,
        details(
            &created.source_ref_name,
            &created.target_ref_name,
            &created.title,
            created_by
        )
    )
}

pub fn pull_request_failed(source_ref: &str, target_ref: &str, title: &str, created_by: &str) -> String {
    format!(
        "{}\n\n🚨 It seems that there was an error while attempting to create the pull request in the target branch {}. Please check if there's already an active pull request from the current source branch {}.\n\n{}\n\nKindly review and address this issue as soon as possible. If you need further assistance, feel free to reach out to the development team.\n\nThank you! 🙏",
        GREETING,
        one_line_code(target_ref),
        one_line_code(source_ref),
        details(source_ref, target_ref, title, created_by)
    )
}

/// Posted when completing the change request itself failed.
pub fn pull_request_completion_failed(pull_request: &PullRequest) -> String {
    format!(
        "{}\n\n🚨 It seems that there was an error while attempting to complete this pull request into {}. Please check the branch policies and the logs.\n\n{}\n\nThank you! 🙏",
        GREETING,
        one_line_code(&pull_request.target_ref_name),
        details(
            &pull_request.source_ref_name,
            &pull_request.target_ref_name,
            &pull_request.title,
            &pull_request.created_by.display_name
        )
    )
}

pub fn beta_skipped() -> String {
    format!(
        "{}\n\nYou use the tag [no-beta] in the title of the pull request.\n\n🚫 The beta publish app process has been ignored based on the title of the pull request. No action has been taken.\n\nIf you believe this is an error or need further assistance, please let us know.\n\nThank you! 🙏",
        GREETING
    )
}

pub fn publish_skipped() -> String {
    format!(
        "{}\n\nYou use the tag [no-publish] in the title of the pull request.\n\n🚫 The publish app process has been ignored based on the title of the pull request. No action has been taken.\n\nIf you believe this is an error or need further assistance, please let us know.\n\nThank you! 🙏",
        GREETING
    )
}
