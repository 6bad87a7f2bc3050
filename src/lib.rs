pub mod cli;
pub mod config;
pub mod connection;
pub mod domain;
pub mod error;
pub mod git;
pub mod host;
pub mod labels;
pub mod notify;
pub mod pipeline;
pub mod release;
pub mod runner;
pub mod ui;

pub use error::{ReleaseError, Result};
