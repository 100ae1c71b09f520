//! CLI command execution.

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::command::{parse, tokenize, Resolver};
use crate::config::Config;
use crate::error::Error;
use crate::paint::Painter;
use crate::prompt::StdinPrompter;
use crate::vcs::Git;

use super::args::Cli;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "BRANCHER_LOG";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Run the statement on the command line and map the outcome to an exit code.
pub fn execute(cli: Cli) -> ExitCode {
    init_logging();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = exit_code(&err);
            if is_reported(&err) {
                eprintln!("brancher: {err:#}");
            }
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    debug!(?config, "config loaded");

    let painter = Painter::new(cli.color.unwrap_or(config.color));
    let git = Git::new(cli.repo);
    let mut prompter = StdinPrompter;
    let mut out = io::stdout().lock();

    let statement = parse(tokenize(cli.args))?;
    let mut resolver = Resolver::new(&git, &mut prompter, &mut out, &config, painter);
    resolver.run(statement)?;
    resolver.finish()?;
    Ok(())
}

fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<Error>().map_or(1, Error::exit_code)
}

fn is_reported(err: &anyhow::Error) -> bool {
    err.downcast_ref::<Error>().map_or(true, Error::is_reported)
}
