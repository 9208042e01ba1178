//! Process invocation seam between commands and the `git` binary.
//!
//! Commands never spawn processes themselves; they hand a working directory
//! and an argument vector to a [`ProcessRunner`]:
//! - [`SystemGit`] runs the real executable
//! - [`MockRunner`] replays scripted outputs and records every call

mod mock;
mod system;

use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::Path;

pub use mock::{MockRunner, RecordedCall};
pub use system::SystemGit;

/// Captured result of one process run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    /// Exit code, or -1 when the process was terminated by a signal
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// A zero exit with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A non-zero exit with the given stderr.
    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }

    /// The diagnostic text to report for a failed run.
    ///
    /// `git` writes some refusals (e.g. "nothing to commit") to stdout.
    pub fn diagnostic(&self) -> &str {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim()
        } else {
            stderr
        }
    }
}

/// Runs the version-control executable.
///
/// Implementations block until the process exits and must not treat a
/// non-zero exit as an error; interpreting the exit code is the caller's job.
pub trait ProcessRunner: Send + Sync + fmt::Debug {
    fn run(&self, working_dir: &Path, args: &[OsString]) -> io::Result<ProcessOutput>;
}
