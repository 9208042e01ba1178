use std::ffi::OsString;

use super::{GitCommand, ensure_configurable, require_non_empty};
use crate::error::{Error, Result};
use crate::repository::Repository;

/// `git checkout`: switch branches.
///
/// Without a branch this runs a bare `git checkout`, which only reports
/// the current state. Setting the branch twice keeps the last value.
#[derive(Debug)]
#[must_use = "commands do nothing until executed"]
pub struct CheckoutCommand<'r> {
    repo: &'r Repository,
    branch: Option<String>,
    create: bool,
    executed: bool,
}

impl<'r> CheckoutCommand<'r> {
    pub(crate) fn new(repo: &'r Repository) -> Self {
        Self {
            repo,
            branch: None,
            create: false,
            executed: false,
        }
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Result<Self> {
        ensure_configurable(self.executed, self.name())?;
        let branch = branch.into();
        require_non_empty(&branch, "checkout branch")?;
        self.branch = Some(branch);
        Ok(self)
    }

    /// Create the branch before switching to it (`-b`).
    pub fn create(mut self, create: bool) -> Result<Self> {
        ensure_configurable(self.executed, self.name())?;
        self.create = create;
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

impl GitCommand for CheckoutCommand<'_> {
    fn name(&self) -> &'static str {
        "checkout"
    }

    fn arguments(&self) -> Result<Vec<OsString>> {
        let mut args: Vec<OsString> = vec!["checkout".into()];
        match (&self.branch, self.create) {
            (Some(branch), true) => {
                args.push("-b".into());
                args.push(OsString::from(branch));
            }
            // `--` keeps a branch from being read as a path of the same name.
            (Some(branch), false) => {
                args.push(OsString::from(branch));
                args.push("--".into());
            }
            (None, true) => {
                return Err(Error::invalid_argument(
                    "checkout with create requires a branch name",
                ));
            }
            (None, false) => {}
        }
        Ok(args)
    }
}
