use std::ffi::OsString;

use super::{GitCommand, ensure_configurable, require_non_empty};
use crate::error::{Error, Result};
use crate::repository::Repository;

/// `git clone`: copy a source repository into the bound directory.
///
/// Use [`Repository::clone_existing`] for the checked one-shot form; it
/// refuses a non-empty target before anything is run.
#[derive(Debug)]
#[must_use = "commands do nothing until executed"]
pub struct CloneCommand<'r> {
    repo: &'r Repository,
    source_url: String,
    branch: Option<String>,
    depth: Option<u32>,
    executed: bool,
}

impl<'r> CloneCommand<'r> {
    pub(crate) fn new(repo: &'r Repository, source_url: impl Into<String>) -> Result<Self> {
        let source_url = source_url.into();
        require_non_empty(&source_url, "clone source URL")?;
        Ok(Self {
            repo,
            source_url,
            branch: None,
            depth: None,
            executed: false,
        })
    }

    /// Check out `branch` instead of the remote HEAD.
    pub fn branch(mut self, branch: impl Into<String>) -> Result<Self> {
        ensure_configurable(self.executed, self.name())?;
        let branch = branch.into();
        require_non_empty(&branch, "clone branch")?;
        self.branch = Some(branch);
        Ok(self)
    }

    /// Shallow clone with `depth` commits of history.
    pub fn depth(mut self, depth: u32) -> Result<Self> {
        ensure_configurable(self.executed, self.name())?;
        if depth == 0 {
            return Err(Error::invalid_argument("clone depth must be at least 1"));
        }
        self.depth = Some(depth);
        Ok(self)
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
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

impl GitCommand for CloneCommand<'_> {
    fn name(&self) -> &'static str {
        "clone"
    }

    fn arguments(&self) -> Result<Vec<OsString>> {
        let mut args: Vec<OsString> = vec!["clone".into()];
        if let Some(branch) = &self.branch {
            args.push("--branch".into());
            args.push(OsString::from(branch));
        }
        if let Some(depth) = self.depth {
            args.push(format!("--depth={depth}").into());
        }
        // Cloned into the working directory itself.
        args.push("--".into());
        args.push(OsString::from(&self.source_url));
        args.push(".".into());
        Ok(args)
    }
}
