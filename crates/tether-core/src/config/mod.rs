//! Configuration for how `git` is invoked.
//!
//! A config file is optional. When present it lives at
//! `<config_dir>/tether/config.toml` and looks like:
//!
//! ```toml
//! binary = "/usr/bin/git"
//!
//! [identity]
//! name = "Build Bot"
//! email = "bot@example.com"
//!
//! [settings]
//! "commit.gpgsign" = "false"
//!
//! [env]
//! GIT_CONFIG_NOSYSTEM = "1"
//! ```

pub mod parser;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use parser::{parse_config_file, parse_config_str, to_toml};

/// Author/committer identity applied to every invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Settings for the `git` process runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Executable to run (a name looked up on `PATH`, or a full path)
    pub binary: PathBuf,
    /// Identity passed as `user.name` / `user.email`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
    /// Extra `-c key=value` pairs
    pub settings: BTreeMap<String, String>,
    /// Extra environment variables
    pub env: BTreeMap<String, String>,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("git"),
            identity: None,
            settings: BTreeMap::new(),
            env: BTreeMap::new(),
        }
    }
}

impl GitConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the executable.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Set the author/committer identity.
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Add a `-c key=value` setting.
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Add an environment variable for the child process.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        parse_config_file(path)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        parse_config_str(content).map_err(|message| crate::Error::Config {
            path: PathBuf::from("<inline>"),
            message,
        })
    }

    /// Load the user's config file if there is one, otherwise defaults.
    pub fn discover() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// `<config_dir>/tether/config.toml`, when a config directory is known.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tether").join("config.toml"))
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        to_toml(self)
    }

    /// `-c key=value` pairs every invocation starts with, identity first.
    pub fn global_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(identity) = &self.identity {
            args.push("-c".to_string());
            args.push(format!("user.name={}", identity.name));
            args.push("-c".to_string());
            args.push(format!("user.email={}", identity.email));
        }
        for (key, value) in &self.settings {
            args.push("-c".to_string());
            args.push(format!("{key}={value}"));
        }
        args
    }

    pub(crate) fn validate(&self) -> std::result::Result<(), String> {
        if self.binary.as_os_str().is_empty() {
            return Err("binary must not be empty".to_string());
        }
        if let Some(identity) = &self.identity {
            if identity.name.trim().is_empty() {
                return Err("identity.name must not be empty".to_string());
            }
            if identity.email.trim().is_empty() {
                return Err("identity.email must not be empty".to_string());
            }
        }
        if let Some(key) = self.settings.keys().find(|key| !key.contains('.')) {
            return Err(format!(
                "setting '{key}' must be a section.name key (e.g. core.autocrlf)"
            ));
        }
        Ok(())
    }
}
