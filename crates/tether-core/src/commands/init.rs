use std::ffi::OsString;

use super::{GitCommand, ensure_configurable, require_non_empty};
use crate::error::Result;
use crate::repository::Repository;

/// `git init`: create the working directory if needed and initialize it.
///
/// Re-running against an existing repository is safe; `git` reinitializes
/// without touching history. Bare repositories are not supported: the
/// bound directory is always a working tree with `.git` inside it.
#[derive(Debug)]
#[must_use = "commands do nothing until executed"]
pub struct InitCommand<'r> {
    repo: &'r Repository,
    initial_branch: Option<String>,
    executed: bool,
}

impl<'r> InitCommand<'r> {
    pub(crate) fn new(repo: &'r Repository) -> Self {
        Self {
            repo,
            initial_branch: None,
            executed: false,
        }
    }

    /// Name of the first branch (`--initial-branch`).
    pub fn initial_branch(mut self, branch: impl Into<String>) -> Result<Self> {
        ensure_configurable(self.executed, self.name())?;
        let branch = branch.into();
        require_non_empty(&branch, "initial branch")?;
        self.initial_branch = Some(branch);
        Ok(self)
    }

    pub fn is_executed(&self) -> bool {
        self.executed
    }

    pub fn execute(&mut self) -> Result<&mut Self> {
        self.executed = true;
        self.repo.create_dir()?;
        self.repo.run_command(&*self)?;
        Ok(self)
    }
}

impl GitCommand for InitCommand<'_> {
    fn name(&self) -> &'static str {
        "init"
    }

    fn arguments(&self) -> Result<Vec<OsString>> {
        let mut args: Vec<OsString> = vec!["init".into()];
        if let Some(branch) = &self.initial_branch {
            args.push(format!("--initial-branch={branch}").into());
        }
        Ok(args)
    }
}
