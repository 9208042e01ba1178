use std::ffi::OsString;

use super::{GitCommand, ensure_configurable, require_non_empty};
use crate::error::{Error, Result};
use crate::repository::Repository;

/// `git pull`: fetch and integrate from a remote.
///
/// Parameterless, this follows the current branch's upstream.
#[derive(Debug)]
#[must_use = "commands do nothing until executed"]
pub struct PullCommand<'r> {
    repo: &'r Repository,
    remote: Option<String>,
    branch: Option<String>,
    rebase: Option<bool>,
    executed: bool,
}

impl<'r> PullCommand<'r> {
    pub(crate) fn new(repo: &'r Repository) -> Self {
        Self {
            repo,
            remote: None,
            branch: None,
            rebase: None,
            executed: false,
        }
    }

    pub fn remote(mut self, remote: impl Into<String>) -> Result<Self> {
        ensure_configurable(self.executed, self.name())?;
        let remote = remote.into();
        require_non_empty(&remote, "pull remote")?;
        self.remote = Some(remote);
        Ok(self)
    }

    /// Remote branch to merge; needs [`remote`](Self::remote) as well.
    pub fn branch(mut self, branch: impl Into<String>) -> Result<Self> {
        ensure_configurable(self.executed, self.name())?;
        let branch = branch.into();
        require_non_empty(&branch, "pull branch")?;
        self.branch = Some(branch);
        Ok(self)
    }

    /// Force `--rebase` (true) or `--no-rebase` (false) regardless of config.
    pub fn rebase(mut self, rebase: bool) -> Result<Self> {
        ensure_configurable(self.executed, self.name())?;
        self.rebase = Some(rebase);
        Ok(self)
    }

    pub fn is_executed(&self) -> bool {
        self.executed
    }

    pub fn execute(&mut self) -> Result<&mut Self> {
        self.executed = true;
        self.repo.run_command(&*self)?;
        Ok(self)
    }
}

impl GitCommand for PullCommand<'_> {
    fn name(&self) -> &'static str {
        "pull"
    }

    fn arguments(&self) -> Result<Vec<OsString>> {
        let mut args: Vec<OsString> = vec!["pull".into()];
        match self.rebase {
            Some(true) => args.push("--rebase".into()),
            Some(false) => args.push("--no-rebase".into()),
            None => {}
        }
        match (&self.remote, &self.branch) {
            (Some(remote), branch) => {
                args.push(OsString::from(remote));
                if let Some(branch) = branch {
                    args.push(OsString::from(branch));
                }
            }
            (None, Some(_)) => {
                return Err(Error::invalid_argument(
                    "pull branch requires a remote to be set",
                ));
            }
            (None, None) => {}
        }
        Ok(args)
    }
}
