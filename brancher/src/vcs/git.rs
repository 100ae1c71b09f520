//! `git` subprocess implementation of [`Vcs`].

use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use tracing::debug;

use super::Vcs;
use crate::error::{Error, Result};

/// Runs `git`, optionally as if started in `repo`.
#[derive(Debug, Clone, Default)]
pub struct Git {
    repo: Option<PathBuf>,
}

impl Git {
    pub const fn new(repo: Option<PathBuf>) -> Self {
        Self { repo }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        if let Some(repo) = &self.repo {
            cmd.arg("-C").arg(repo);
        }
        cmd.args(args);
        cmd
    }

    fn command_line(args: &[&str]) -> String {
        format!("git {}", args.join(" "))
    }

    /// Run a query and return its trimmed stdout.
    fn query(&self, args: &[&str]) -> Result<String> {
        debug!(command = %Self::command_line(args), "query");
        let output: Output = self
            .command(args)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()?;

        if !output.status.success() {
            return Err(Error::CommandFailed {
                command: Self::command_line(args),
                code: output.status.code().unwrap_or(1),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run a command with the terminal attached, so git can talk to the user.
    fn run(&self, args: &[&str]) -> Result<()> {
        debug!(command = %Self::command_line(args), "run");
        let status = self.command(args).status()?;

        if !status.success() {
            return Err(Error::CommandFailed {
                command: Self::command_line(args),
                code: status.code().unwrap_or(1),
            });
        }

        Ok(())
    }
}

impl Vcs for Git {
    fn list_branches(&self) -> Result<Vec<String>> {
        let out = self.query(&["for-each-ref", "--format=%(refname:short)", "refs/heads/"])?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    fn current_branch(&self) -> Result<String> {
        self.query(&["branch", "--show-current"])
    }

    fn switch_to(&self, name: &str) -> Result<()> {
        self.run(&["checkout", name])
    }

    fn create_and_switch(&self, name: &str) -> Result<()> {
        self.run(&["checkout", "-b", name])
    }

    fn delete_branch(&self, name: &str, force: bool) -> Result<()> {
        let flag = if force { "-D" } else { "-d" };
        self.run(&["branch", flag, name])
    }

    fn control_dir(&self) -> Result<PathBuf> {
        let dir = PathBuf::from(self.query(&["rev-parse", "--git-common-dir"])?);
        if dir.is_absolute() {
            return Ok(dir);
        }
        // Relative output is relative to the directory git ran in.
        match &self.repo {
            Some(repo) => Ok(repo.join(dir)),
            None => Ok(std::env::current_dir()?.join(dir)),
        }
    }
}
