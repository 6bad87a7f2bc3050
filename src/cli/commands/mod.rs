//! Task entry points
//!
//! Each command validates its inputs, connects to the pull request and hands
//! over to the library. `execute` functions take their collaborators as
//! arguments; `run` wires the real ones and folds the result into a
//! [TaskOutcome].

pub mod labels;
pub mod merge_into;
pub mod release;

use crate::error::ReleaseError;
use crate::pipeline::TaskOutcome;
use crate::ui;

fn failed(error: ReleaseError) -> TaskOutcome {
    let message = error.to_string();
    log::error!("{}", message);
    ui::display_error(&message);
    TaskOutcome::failed(message)
}
