//! Deferred, fluently configured `git` operations.
//!
//! Every command is created by a [`Repository`](crate::Repository) factory,
//! borrows that repository, and does nothing until `execute()` is called:
//!
//! ```no_run
//! # fn main() -> tether_core::Result<()> {
//! # let repo = tether_core::Repository::open(".")?;
//! repo.add()
//!     .file_pattern("src/")?
//!     .file_pattern("Cargo.toml")?
//!     .execute()?;
//! # Ok(())
//! # }
//! ```
//!
//! Setters take the command by value and validate eagerly, so an empty
//! argument fails with [`Error::InvalidArgument`] at the call that supplied
//! it. A setter called after `execute()` fails with [`Error::InvalidState`].
//! Calling `execute()` again re-runs the operation.

mod add;
mod checkout;
mod clone;
mod commit;
mod init;
mod pull;
mod status;

use std::ffi::OsString;

use crate::error::{Error, Result};

pub use add::AddCommand;
pub use checkout::CheckoutCommand;
pub use clone::CloneCommand;
pub use commit::CommitCommand;
pub use init::InitCommand;
pub use pull::PullCommand;
pub use status::StatusCommand;

/// Resolves a command's configuration into a `git` argument vector.
pub trait GitCommand {
    /// The `git` subcommand, used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Arguments handed to the process runner, subcommand first.
    ///
    /// Fails when the configuration is incomplete.
    fn arguments(&self) -> Result<Vec<OsString>>;
}

/// Reject configuration changes once a command has run.
fn ensure_configurable(executed: bool, name: &str) -> Result<()> {
    if executed {
        return Err(Error::invalid_state(format!(
            "{name} command has already been executed and can no longer be configured"
        )));
    }
    Ok(())
}

fn require_non_empty(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid_argument(format!("{what} must not be empty")));
    }
    Ok(())
}
