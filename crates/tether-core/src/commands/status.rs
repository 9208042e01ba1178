use std::ffi::OsString;

use super::GitCommand;
use crate::error::Result;
use crate::repository::Repository;

/// `git status --porcelain`: raw machine-readable working tree state.
///
/// Feed the output to [`parse_porcelain`](crate::status::parse_porcelain)
/// or [`ChangeSet::parse`](crate::status::ChangeSet::parse).
#[derive(Debug)]
#[must_use = "commands do nothing until executed"]
pub struct StatusCommand<'r> {
    repo: &'r Repository,
}

impl<'r> StatusCommand<'r> {
    pub(crate) fn new(repo: &'r Repository) -> Self {
        Self { repo }
    }

    pub fn execute(&self) -> Result<String> {
        Ok(self.repo.run_command(self)?.stdout)
    }
}

impl GitCommand for StatusCommand<'_> {
    fn name(&self) -> &'static str {
        "status"
    }

    fn arguments(&self) -> Result<Vec<OsString>> {
        Ok(vec![
            "-c".into(),
            "core.quotePath=false".into(),
            "status".into(),
            "--porcelain=v1".into(),
            "--untracked-files=all".into(),
        ])
    }
}
