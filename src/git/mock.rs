use crate::error::Result;
use crate::git::WorkingCopy;

/// Mock working copy for testing without a repository on disk
#[derive(Debug, Clone, Default)]
pub struct MockWorkingCopy {
    shallow: bool,
    tracked_changes: bool,
}

impl MockWorkingCopy {
    /// A full clone with a clean tree
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shallow(mut self) -> Self {
        self.shallow = true;
        self
    }

    pub fn with_tracked_changes(mut self) -> Self {
        self.tracked_changes = true;
        self
    }
}

impl WorkingCopy for MockWorkingCopy {
    fn is_shallow(&self) -> Result<bool> {
        Ok(self.shallow)
    }

    fn has_tracked_changes(&self) -> Result<bool> {
        Ok(self.tracked_changes)
    }
}
