//! Gateway to the underlying version-control tool.
//!
//! Every operation is a blocking call. A non-zero exit status from the tool
//! is reported as [`Error::CommandFailed`](crate::error::Error::CommandFailed)
//! and is fatal to the current statement.

mod git;

#[cfg(test)]
pub mod fake;

pub use git::Git;

use std::path::PathBuf;

use crate::error::Result;

/// Branch operations the tool relies on.
pub trait Vcs {
    /// Local branch names, in the tool's order.
    fn list_branches(&self) -> Result<Vec<String>>;

    /// Name of the checked-out branch (empty when HEAD is detached).
    fn current_branch(&self) -> Result<String>;

    /// Check out an existing branch.
    fn switch_to(&self, name: &str) -> Result<()>;

    /// Create a branch at HEAD and check it out.
    fn create_and_switch(&self, name: &str) -> Result<()>;

    /// Delete a local branch.
    fn delete_branch(&self, name: &str, force: bool) -> Result<()>;

    /// Repository-internal directory shared by all worktrees.
    fn control_dir(&self) -> Result<PathBuf>;
}
