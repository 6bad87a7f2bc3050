//! Domain logic - pure release rules independent of git, processes and HTTP

pub mod classification;
pub mod context;
pub mod label;
pub mod pull_request;
pub mod version;

pub use classification::{
    classify, skip_tags, ChangelogSection, ReleaseClassification, ReleaseKind, SkipTags,
};
pub use context::ReleaseContext;
pub use label::{LabelAction, LabelOperation};
pub use pull_request::{CommitRef, IdentityRef, NewPullRequest, PullRequest, RepositoryRef};
pub use version::{parse_probe_output, ProbeFormat, VersionInfo};
