use std::ffi::OsString;

use super::{GitCommand, ensure_configurable, require_non_empty};
use crate::error::Result;
use crate::repository::Repository;

/// `git commit`: record exactly what is currently staged.
#[derive(Debug)]
#[must_use = "commands do nothing until executed"]
pub struct CommitCommand<'r> {
    repo: &'r Repository,
    message: String,
    allow_empty: bool,
    executed: bool,
}

impl<'r> CommitCommand<'r> {
    pub(crate) fn new(repo: &'r Repository, message: impl Into<String>) -> Result<Self> {
        let message = message.into();
        require_non_empty(&message, "commit message")?;
        Ok(Self {
            repo,
            message,
            allow_empty: false,
            executed: false,
        })
    }

    /// Permit a commit with nothing staged.
    pub fn allow_empty(mut self, allow: bool) -> Result<Self> {
        ensure_configurable(self.executed, self.name())?;
        self.allow_empty = allow;
        Ok(self)
    }

    pub fn message(&self) -> &str {
        &self.message
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

impl GitCommand for CommitCommand<'_> {
    fn name(&self) -> &'static str {
        "commit"
    }

    fn arguments(&self) -> Result<Vec<OsString>> {
        let mut args: Vec<OsString> = vec!["commit".into()];
        if self.allow_empty {
            args.push("--allow-empty".into());
        }
        args.push("-m".into());
        args.push(OsString::from(&self.message));
        Ok(args)
    }
}
