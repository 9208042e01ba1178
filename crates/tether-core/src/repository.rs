//! The aggregate bound to one working directory.
//!
//! A [`Repository`] holds no cached state: every query re-runs `git status`
//! because the directory can change underneath the process at any time.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::commands::{
    AddCommand, CheckoutCommand, CloneCommand, CommitCommand, GitCommand, InitCommand,
    PullCommand, StatusCommand,
};
use crate::config::GitConfig;
use crate::error::{Error, Result};
use crate::process::{ProcessOutput, ProcessRunner, SystemGit};
use crate::status::{ChangeSet, StatusEntry, parse_porcelain};

/// A working directory driven through the `git` binary.
///
/// Commands for the same repository must not run concurrently; distinct
/// repositories may be used from different threads.
#[derive(Debug, Clone)]
pub struct Repository {
    cwd: PathBuf,
    runner: Arc<dyn ProcessRunner>,
}

impl Repository {
    /// Bind to an existing directory.
    ///
    /// Fails with [`Error::InvalidState`] when the directory does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(Error::invalid_state(format!(
                "directory does not exist: {}",
                path.display()
            )));
        }
        Self::bind(path)
    }

    /// Bind to a directory that may not exist yet.
    ///
    /// The directory is created by [`init`](Self::init) or
    /// [`clone_existing`](Self::clone_existing), never here.
    pub fn open_allow_missing(path: impl AsRef<Path>) -> Result<Self> {
        Self::bind(path.as_ref())
    }

    fn bind(path: &Path) -> Result<Self> {
        let cwd = normalize(path)?;
        debug!(cwd = %cwd.display(), "bound repository");
        Ok(Self {
            cwd,
            runner: Arc::new(SystemGit::default()),
        })
    }

    /// Use a different process runner.
    pub fn with_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Run the system `git` configured by `config`.
    pub fn with_config(self, config: &GitConfig) -> Self {
        self.with_runner(Arc::new(SystemGit::from_config(config)))
    }

    /// True iff `path` holds repository metadata (a `.git` directory, or a
    /// `.git` file for linked worktrees and submodules).
    pub fn exists(path: impl AsRef<Path>) -> bool {
        let dot_git = path.as_ref().join(".git");
        dot_git.is_dir() || dot_git.is_file()
    }

    /// The bound working directory (absolute).
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Whether the working directory exists right now.
    pub fn dir_exists(&self) -> bool {
        self.cwd.is_dir()
    }

    /// Whether the working directory has been initialized.
    pub fn is_initialized(&self) -> bool {
        Self::exists(&self.cwd)
    }

    // -------------------------------------------------------------------------
    // Command factories
    // -------------------------------------------------------------------------

    pub fn init(&self) -> InitCommand<'_> {
        InitCommand::new(self)
    }

    pub fn add(&self) -> AddCommand<'_> {
        AddCommand::new(self)
    }

    /// Commit exactly what is staged now; `message` must not be empty.
    ///
    /// Runs immediately. Use [`commit_command`](Self::commit_command) to
    /// configure the commit before running it.
    #[instrument(skip(self, message), fields(cwd = %self.cwd.display()))]
    pub fn commit(&self, message: impl Into<String>) -> Result<()> {
        self.commit_command(message)?.execute()?;
        Ok(())
    }

    /// A configurable commit of the staged changes.
    pub fn commit_command(&self, message: impl Into<String>) -> Result<CommitCommand<'_>> {
        CommitCommand::new(self, message)
    }

    pub fn checkout(&self) -> CheckoutCommand<'_> {
        CheckoutCommand::new(self)
    }

    pub fn pull(&self) -> PullCommand<'_> {
        PullCommand::new(self)
    }

    pub fn status_command(&self) -> StatusCommand<'_> {
        StatusCommand::new(self)
    }

    /// A configurable clone of `source_url` into this directory.
    ///
    /// Unlike [`clone_existing`](Self::clone_existing), the target is not
    /// checked before execution; `git` reports a non-empty target itself.
    pub fn clone_from(&self, source_url: impl Into<String>) -> Result<CloneCommand<'_>> {
        CloneCommand::new(self, source_url)
    }

    /// Clone `source_url` into the bound directory.
    ///
    /// Fails with [`Error::InvalidState`] without running anything when the
    /// directory already exists and is not empty. A directory created for
    /// a clone that then fails is removed again.
    #[instrument(skip(self), fields(cwd = %self.cwd.display()))]
    pub fn clone_existing(&self, source_url: &str) -> Result<()> {
        let mut command = CloneCommand::new(self, source_url)?;
        let existed = self.dir_exists();
        if existed && !self.is_empty_dir()? {
            return Err(Error::invalid_state(format!(
                "cannot clone into non-empty directory: {}",
                self.cwd.display()
            )));
        }
        if let Err(err) = command.execute() {
            if !existed {
                self.remove_created_dir();
            }
            return Err(err);
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // State queries
    // -------------------------------------------------------------------------

    /// Parsed status lines, in the order `git` printed them.
    pub fn status_entries(&self) -> Result<Vec<StatusEntry>> {
        let output = self.status_command().execute()?;
        Ok(parse_porcelain(&output))
    }

    /// Staged and unstaged paths relative to the working directory.
    #[instrument(skip(self), fields(cwd = %self.cwd.display()))]
    pub fn status(&self) -> Result<ChangeSet> {
        let changes = ChangeSet::from_entries(&self.status_entries()?);
        debug!(
            staged = changes.staged.len(),
            unstaged = changes.unstaged.len(),
            "collected status"
        );
        Ok(changes)
    }

    /// True iff anything is staged, modified, or untracked.
    pub fn is_dirty(&self) -> Result<bool> {
        Ok(!self.status()?.is_clean())
    }

    pub fn staged_changes(&self) -> Result<Vec<String>> {
        Ok(self.status()?.staged)
    }

    /// Modified and untracked paths not yet staged.
    pub fn unstaged_changes(&self) -> Result<Vec<String>> {
        Ok(self.status()?.unstaged)
    }

    // -------------------------------------------------------------------------
    // Execution
    // -------------------------------------------------------------------------

    /// Run a command in the working directory, mapping a non-zero exit to
    /// [`Error::CommandFailed`].
    pub(crate) fn run_command<C: GitCommand + ?Sized>(&self, command: &C) -> Result<ProcessOutput> {
        let name = command.name();
        let args = command.arguments()?;

        if !self.dir_exists() {
            return Err(Error::invalid_state(format!(
                "directory does not exist: {}",
                self.cwd.display()
            )));
        }

        debug!(command = name, cwd = %self.cwd.display(), "executing git command");
        let output = self
            .runner
            .run(&self.cwd, &args)
            .map_err(|source| Error::Spawn {
                command: name.to_string(),
                source,
            })?;

        if !output.is_success() {
            warn!(
                command = name,
                exit_code = output.exit_code,
                "git command failed"
            );
            return Err(Error::CommandFailed {
                command: name.to_string(),
                exit_code: output.exit_code,
                stderr: output.diagnostic().to_string(),
            });
        }

        Ok(output)
    }

    pub(crate) fn create_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.cwd).map_err(|e| {
            Error::io(
                format!("Failed to create directory: {}", self.cwd.display()),
                e,
            )
        })
    }

    fn remove_created_dir(&self) {
        if let Err(e) = std::fs::remove_dir_all(&self.cwd) {
            warn!(
                cwd = %self.cwd.display(),
                error = %e,
                "failed to remove directory after failed clone"
            );
        }
    }

    fn is_empty_dir(&self) -> Result<bool> {
        let mut entries = std::fs::read_dir(&self.cwd).map_err(|e| {
            Error::io(
                format!("Failed to read directory: {}", self.cwd.display()),
                e,
            )
        })?;
        Ok(entries.next().is_none())
    }
}

/// Absolute form of `path` without `.` or `..` components.
///
/// The deepest existing ancestor is canonicalized so a missing directory
/// resolves under the same prefix it will have once created.
fn normalize(path: &Path) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(Error::invalid_argument("repository path must not be empty"));
    }
    let resolve_err =
        |e: std::io::Error| Error::io(format!("Failed to resolve path: {}", path.display()), e);
    let cleaned = lexical_clean(&std::path::absolute(path).map_err(resolve_err)?);

    let mut existing = cleaned.as_path();
    let mut missing = Vec::new();
    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return Ok(cleaned),
        }
    }

    let mut resolved = existing.canonicalize().map_err(resolve_err)?;
    resolved.extend(missing.iter().rev());
    Ok(resolved)
}

/// Drop `.` and fold `..` into the preceding component.
fn lexical_clean(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other),
        }
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::MockRunner;
    use tempfile::TempDir;

    fn mocked(path: &Path) -> (Repository, MockRunner) {
        let mock = MockRunner::new();
        let repo = Repository::open_allow_missing(path)
            .unwrap()
            .with_runner(Arc::new(mock.clone()));
        (repo, mock)
    }

    #[test]
    fn open_rejects_missing_directory() {
        let temp = TempDir::new().unwrap();
        let err = Repository::open(temp.path().join("missing")).unwrap_err();
        assert!(err.is_invalid_state(), "unexpected error: {err}");
        assert!(!temp.path().join("missing").exists());
    }

    #[test]
    fn open_allow_missing_does_not_create() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("later");
        let repo = Repository::open_allow_missing(&target).unwrap();
        assert!(!repo.dir_exists());
        assert!(repo.cwd().is_absolute());
        assert!(repo.cwd().ends_with("later"));
    }

    #[test]
    fn missing_path_is_normalized() {
        let temp = TempDir::new().unwrap();
        let repo = Repository::open_allow_missing(temp.path().join("a/../b/./c")).unwrap();

        let expected = temp.path().canonicalize().unwrap().join("b").join("c");
        assert_eq!(repo.cwd(), expected);
        assert!(
            !repo
                .cwd()
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::CurDir))
        );
    }

    #[test]
    fn init_through_dotdot_leaves_no_stray_directory() {
        let temp = TempDir::new().unwrap();
        let (repo, _mock) = mocked(&temp.path().join("a/../b"));

        repo.init().execute().unwrap();

        assert!(temp.path().join("b").is_dir());
        assert!(!temp.path().join("a").exists());
    }

    #[test]
    fn existing_path_is_canonicalized() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("a")).unwrap();
        let repo = Repository::open(temp.path().join("a/..")).unwrap();
        assert_eq!(repo.cwd(), temp.path().canonicalize().unwrap());
    }

    #[test]
    fn exists_requires_dot_git() {
        let temp = TempDir::new().unwrap();
        assert!(!Repository::exists(temp.path()));
        std::fs::create_dir(temp.path().join(".git")).unwrap();
        assert!(Repository::exists(temp.path()));
    }

    #[test]
    fn exists_accepts_gitdir_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".git"), "gitdir: ../main/.git/worktrees/x\n").unwrap();
        assert!(Repository::exists(temp.path()));
    }

    #[test]
    fn status_queries_rerun_git_every_time() {
        let temp = TempDir::new().unwrap();
        let (repo, mock) = mocked(temp.path());
        mock.expect_success("?? a.txt\n")
            .expect_success("A  a.txt\n");

        assert_eq!(repo.unstaged_changes().unwrap(), vec!["a.txt"]);
        assert_eq!(repo.staged_changes().unwrap(), vec!["a.txt"]);
        assert_eq!(mock.calls().len(), 2);
        assert!(mock.calls().iter().all(|c| c.working_dir == repo.cwd()));
    }

    #[test]
    fn is_dirty_reflects_status() {
        let temp = TempDir::new().unwrap();
        let (repo, mock) = mocked(temp.path());
        mock.expect_success("").expect_success("?? new.txt\n");

        assert!(!repo.is_dirty().unwrap());
        assert!(repo.is_dirty().unwrap());
    }

    #[test]
    fn non_zero_exit_becomes_command_failed() {
        let temp = TempDir::new().unwrap();
        let (repo, mock) = mocked(temp.path());
        mock.expect_failure(128, "fatal: not a git repository (or any of the parent directories): .git\n");

        let err = repo.status().unwrap_err();
        match err {
            Error::CommandFailed {
                command,
                exit_code,
                stderr,
            } => {
                assert_eq!(command, "status");
                assert_eq!(exit_code, 128);
                assert!(stderr.starts_with("fatal: not a git repository"));
            }
            other => panic!("expected CommandFailed, got {other:?}"),
        }
    }

    #[test]
    fn queries_on_missing_directory_fail_without_running_git() {
        let temp = TempDir::new().unwrap();
        let (repo, mock) = mocked(&temp.path().join("missing"));

        let err = repo.is_dirty().unwrap_err();
        assert!(err.is_invalid_state());
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn clone_into_non_empty_directory_never_runs_git() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("README.md"), "occupied").unwrap();
        let (repo, mock) = mocked(temp.path());

        let err = repo
            .clone_existing("https://example.com/project.git")
            .unwrap_err();
        assert!(err.is_invalid_state(), "unexpected error: {err}");
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn clone_creates_missing_target_and_clones_into_it() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("fresh");
        let (repo, mock) = mocked(&target);

        repo.clone_existing("https://example.com/project.git").unwrap();

        assert!(target.is_dir());
        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].working_dir, repo.cwd());
        assert_eq!(
            calls[0].args,
            vec!["clone", "--", "https://example.com/project.git", "."]
        );
    }

    #[test]
    fn failed_clone_removes_the_directory_it_created() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("fresh");
        let (repo, mock) = mocked(&target);
        mock.expect_failure(128, "fatal: repository 'nowhere' does not exist\n");

        let err = repo.clone_existing("nowhere").unwrap_err();

        assert!(err.is_command_failed(), "unexpected error: {err}");
        assert!(!target.exists());
    }

    #[test]
    fn failed_clone_keeps_an_existing_empty_directory() {
        let temp = TempDir::new().unwrap();
        let (repo, mock) = mocked(temp.path());
        mock.expect_failure(128, "fatal: could not read from remote\n");

        assert!(repo.clone_existing("nowhere").unwrap_err().is_command_failed());
        assert!(temp.path().is_dir());
    }

    #[test]
    fn commit_runs_immediately() {
        let temp = TempDir::new().unwrap();
        let (repo, mock) = mocked(temp.path());

        repo.commit("Added new files").unwrap();

        assert_eq!(
            mock.call_args(),
            vec![vec!["commit", "-m", "Added new files"]]
        );
    }

    #[test]
    fn commit_with_empty_message_runs_nothing() {
        let temp = TempDir::new().unwrap();
        let (repo, mock) = mocked(temp.path());

        assert!(repo.commit("").unwrap_err().is_invalid_argument());
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn clone_into_empty_existing_directory_is_allowed() {
        let temp = TempDir::new().unwrap();
        let (repo, mock) = mocked(temp.path());

        repo.clone_existing("/srv/git/origin.git").unwrap();
        assert_eq!(mock.calls().len(), 1);
    }

    #[test]
    fn clone_with_empty_url_is_invalid_argument() {
        let temp = TempDir::new().unwrap();
        let (repo, mock) = mocked(temp.path());

        assert!(repo.clone_existing("").unwrap_err().is_invalid_argument());
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn spawn_failure_is_reported() {
        let temp = TempDir::new().unwrap();
        let repo = Repository::open(temp.path())
            .unwrap()
            .with_config(&GitConfig::new().with_binary("/nonexistent/git-binary"));

        let err = repo.status().unwrap_err();
        assert!(matches!(err, Error::Spawn { ref command, .. } if command == "status"));
    }
}
