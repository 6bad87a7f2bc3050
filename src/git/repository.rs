use crate::error::Result;
use crate::git::WorkingCopy;
use git2::{Repository, StatusOptions};
use std::path::{Path, PathBuf};

/// Working copy inspected through `git2`
///
/// The repository is reopened for every query because the CLI steps change
/// its state between calls.
pub struct Git2WorkingCopy {
    path: PathBuf,
}

impl Git2WorkingCopy {
    /// Discover the repository containing `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path)?;
        let root = repo
            .workdir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| repo.path().to_path_buf());

        Ok(Git2WorkingCopy { path: root })
    }

    fn repo(&self) -> Result<Repository> {
        Ok(Repository::open(&self.path)?)
    }
}

impl WorkingCopy for Git2WorkingCopy {
    fn is_shallow(&self) -> Result<bool> {
        Ok(self.repo()?.is_shallow())
    }

    fn has_tracked_changes(&self) -> Result<bool> {
        let repo = self.repo()?;
        let mut options = StatusOptions::new();
        options.include_untracked(false).include_ignored(false);
        let statuses = repo.statuses(Some(&mut options))?;
        Ok(!statuses.is_empty())
    }
}
