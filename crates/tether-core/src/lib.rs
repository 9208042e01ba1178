//! Tether Core Library
//!
//! A typed façade over the `git` binary: bind a [`Repository`] to a working
//! directory, build commands fluently, execute them, and read the working
//! tree state back as structured change-sets.
//!
//! ```no_run
//! use tether_core::Repository;
//!
//! # fn main() -> tether_core::Result<()> {
//! let repo = Repository::open_allow_missing("/tmp/project")?;
//! repo.init().execute()?;
//! repo.add().file_pattern(".")?.execute()?;
//! repo.commit("Initial import")?;
//! assert!(!repo.is_dirty()?);
//! # Ok(())
//! # }
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod process;
pub mod repository;
pub mod status;

pub use error::{Error, Result};
pub use repository::Repository;

/// Re-exports of commonly used types
pub mod prelude {
    // Repository
    pub use crate::repository::Repository;

    // Commands
    pub use crate::commands::{
        AddCommand, CheckoutCommand, CloneCommand, CommitCommand, GitCommand, InitCommand,
        PullCommand, StatusCommand,
    };

    // Status
    pub use crate::status::{ChangeSet, StatusCode, StatusEntry, parse_porcelain};

    // Process
    pub use crate::process::{MockRunner, ProcessOutput, ProcessRunner, SystemGit};

    // Configuration
    pub use crate::config::{GitConfig, Identity};

    // Errors
    pub use crate::error::{Error, Result};
}
