use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, trace};

use super::{ProcessOutput, ProcessRunner};
use crate::config::GitConfig;

/// Inherited variables that would redirect git away from the working directory.
const GIT_ENV_OVERRIDES: [&str; 4] = [
    "GIT_DIR",
    "GIT_WORK_TREE",
    "GIT_INDEX_FILE",
    "GIT_COMMON_DIR",
];

/// Runs the system `git` executable.
#[derive(Debug, Clone)]
pub struct SystemGit {
    binary: PathBuf,
    global_args: Vec<String>,
    env: Vec<(String, String)>,
}

impl Default for SystemGit {
    fn default() -> Self {
        Self::from_config(&GitConfig::default())
    }
}

impl SystemGit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &GitConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            global_args: config.global_args(),
            env: config
                .env
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn command(&self, working_dir: &Path, args: &[OsString]) -> Command {
        let mut cmd = Command::new(&self.binary);
        for key in GIT_ENV_OVERRIDES {
            cmd.env_remove(key);
        }
        cmd.env("GIT_TERMINAL_PROMPT", "0");
        for (key, value) in &self.env {
            trace!("Setting env var: {}={}", key, value);
            cmd.env(key, value);
        }

        cmd.args(&self.global_args)
            .args(args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl ProcessRunner for SystemGit {
    fn run(&self, working_dir: &Path, args: &[OsString]) -> io::Result<ProcessOutput> {
        debug!(
            binary = %self.binary.display(),
            cwd = %working_dir.display(),
            ?args,
            "spawning git"
        );

        let output = self.command(working_dir, args).output()?;
        let exit_code = output.status.code().unwrap_or(-1);

        debug!(exit_code, "git exited");

        Ok(ProcessOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Identity;

    #[test]
    fn identity_and_settings_precede_arguments() {
        let config = GitConfig::new()
            .with_identity(Identity::new("Tester", "tester@example.com"))
            .with_setting("commit.gpgsign", "false");
        let runner = SystemGit::from_config(&config);

        let cmd = runner.command(Path::new("/tmp"), &[OsString::from("status")]);
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();

        assert_eq!(
            args,
            vec![
                "-c",
                "user.name=Tester",
                "-c",
                "user.email=tester@example.com",
                "-c",
                "commit.gpgsign=false",
                "status",
            ]
        );
        assert_eq!(cmd.get_current_dir(), Some(Path::new("/tmp")));
    }

    #[test]
    fn strips_redirecting_environment() {
        let runner = SystemGit::from_config(&GitConfig::new().with_env("GIT_CONFIG_NOSYSTEM", "1"));
        let cmd = runner.command(Path::new("/tmp"), &[]);
        let envs: Vec<_> = cmd.get_envs().collect();

        for key in GIT_ENV_OVERRIDES {
            assert!(
                envs.iter()
                    .any(|(k, v)| *k == std::ffi::OsStr::new(key) && v.is_none()),
                "{key} should be removed"
            );
        }
        assert!(envs.iter().any(|(k, v)| *k == std::ffi::OsStr::new("GIT_TERMINAL_PROMPT")
            && *v == Some(std::ffi::OsStr::new("0"))));
        assert!(envs.iter().any(|(k, v)| *k == std::ffi::OsStr::new("GIT_CONFIG_NOSYSTEM")
            && *v == Some(std::ffi::OsStr::new("1"))));
    }

    #[test]
    fn missing_binary_is_spawn_error() {
        let runner = SystemGit::from_config(
            &GitConfig::new().with_binary("/nonexistent/definitely-not-git"),
        );
        let err = runner
            .run(Path::new("/"), &[OsString::from("--version")])
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
