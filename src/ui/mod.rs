//! Console output for pipeline logs.
//!
//! All tasks run unattended on a build agent, so there is no interactive
//! input here; this module only renders progress for the build log.

pub mod formatter;

pub use formatter::{
    display_commit_list, display_error, display_label_plan, display_status, display_success,
    display_version_change, display_warning,
};
