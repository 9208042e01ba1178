use std::ffi::OsString;

use super::{GitCommand, ensure_configurable, require_non_empty};
use crate::error::{Error, Result};
use crate::repository::Repository;

/// `git add`: stage paths matching one or more patterns.
///
/// Patterns accumulate: every `file_pattern` call adds to the set staged by
/// a single invocation, in call order, with duplicates collapsed. `"."`
/// stages every change in the working directory.
#[derive(Debug)]
#[must_use = "commands do nothing until executed"]
pub struct AddCommand<'r> {
    repo: &'r Repository,
    patterns: Vec<String>,
    executed: bool,
}

impl<'r> AddCommand<'r> {
    pub(crate) fn new(repo: &'r Repository) -> Self {
        Self {
            repo,
            patterns: Vec::new(),
            executed: false,
        }
    }

    /// Add a path or glob to stage.
    pub fn file_pattern(mut self, pattern: impl Into<String>) -> Result<Self> {
        ensure_configurable(self.executed, self.name())?;
        let pattern = pattern.into();
        require_non_empty(&pattern, "file pattern")?;
        if !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
        Ok(self)
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
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

impl GitCommand for AddCommand<'_> {
    fn name(&self) -> &'static str {
        "add"
    }

    fn arguments(&self) -> Result<Vec<OsString>> {
        if self.patterns.is_empty() {
            return Err(Error::invalid_argument(
                "add requires at least one file pattern",
            ));
        }
        let mut args: Vec<OsString> = vec!["add".into(), "--".into()];
        args.extend(self.patterns.iter().map(OsString::from));
        Ok(args)
    }
}
