//! Pipeline host protocol
//!
//! - `env` - pipeline variables read once at process entry
//! - `task` - the tri-state task result and its `##vso` logging command

pub mod env;
pub mod task;

pub use env::PipelineEnv;
pub use task::{TaskOutcome, TaskResult};
