use std::collections::VecDeque;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{ProcessOutput, ProcessRunner};

/// One invocation seen by a [`MockRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub working_dir: PathBuf,
    pub args: Vec<String>,
}

#[derive(Debug, Default)]
struct MockState {
    responses: VecDeque<ProcessOutput>,
    calls: Vec<RecordedCall>,
}

/// Scripted runner for tests.
///
/// Responses are returned in the order they were queued; once the queue is
/// empty every call succeeds with empty output. Clones share state, so a
/// test can keep one handle and give another to a repository.
#[derive(Debug, Clone, Default)]
pub struct MockRunner {
    state: Arc<Mutex<MockState>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the output for the next unanswered call.
    pub fn push_response(&self, output: ProcessOutput) -> &Self {
        self.lock().responses.push_back(output);
        self
    }

    /// Queue a successful run printing `stdout`.
    pub fn expect_success(&self, stdout: impl Into<String>) -> &Self {
        self.push_response(ProcessOutput::success(stdout))
    }

    /// Queue a failed run.
    pub fn expect_failure(&self, exit_code: i32, stderr: impl Into<String>) -> &Self {
        self.push_response(ProcessOutput::failure(exit_code, stderr))
    }

    /// Every call made so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Argument vectors of every call made so far.
    pub fn call_args(&self) -> Vec<Vec<String>> {
        self.lock().calls.iter().map(|c| c.args.clone()).collect()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // Keep recording after another test thread panicked.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ProcessRunner for MockRunner {
    fn run(&self, working_dir: &Path, args: &[OsString]) -> io::Result<ProcessOutput> {
        let mut state = self.lock();
        state.calls.push(RecordedCall {
            working_dir: working_dir.to_path_buf(),
            args: args
                .iter()
                .map(|a| a.to_string_lossy().into_owned())
                .collect(),
        });
        Ok(state.responses.pop_front().unwrap_or_default())
    }
}
