//! Brancher - numbered, annotated branch switching on top of git.
//!
//! Keeps per-branch metadata (stable id, recency, annotation, status) and a
//! short history of switches next to the repository, and exposes one small
//! command language to read and change it while checking out, creating and
//! deleting branches.
//!
//! Architecture:
//! - `command` lexes and parses the arguments into one statement and runs it
//! - `store` keeps the metadata table in step with git's branch list
//! - `vcs` is the only place that talks to git
//! - Metadata is written back once, after the statement succeeded

mod cli;
mod command;
mod config;
mod error;
mod history;
mod paint;
mod prompt;
mod store;
mod vcs;

use std::process::ExitCode;

use clap::Parser;

use cli::{execute, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    execute(cli)
}
