//! Pure formatting functions for console output.
//!
//! Pipeline agents capture stdout/stderr into the build log; colors are
//! rendered through `console` so they degrade cleanly when the log viewer
//! does not support ANSI sequences.

use console::style;

use crate::domain::LabelOperation;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Format and print a non-fatal warning.
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), message);
}

/// Display the commits included in the change request.
///
/// Shows up to 10 commits; the remainder is summarised as a count.
pub fn display_commit_list(commits: &[String], pull_request_id: i64) {
    println!(
        "\n{}",
        style(format!("Commits in pull request #{}", pull_request_id)).bold()
    );

    for (i, commit) in commits.iter().take(10).enumerate() {
        println!("  {}. {}", i + 1, truncate(commit, 72));
    }

    if commits.len() > 10 {
        println!("  ... and {} more commits", commits.len() - 10);
    }
}

/// Display the planned label operations.
pub fn display_label_plan(operations: &[LabelOperation]) {
    println!("{}", style("Planned label operations:").bold());
    for op in operations {
        println!("  {}", op);
    }
}

/// Display the version transition of a release.
pub fn display_version_change(app_name: &str, old_version: &str, new_version: &str) {
    println!("\n{} {}", style("Release:").bold(), app_name);
    println!("  From: {}", style(old_version).red());
    println!("  To:   {}", style(new_version).green());
}

fn truncate(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().next().unwrap_or("");
    if first_line.chars().count() > max_chars {
        let cut: String = first_line.chars().take(max_chars).collect();
        format!("{}…", cut)
    } else {
        first_line.to_string()
    }
}
