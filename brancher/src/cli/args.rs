//! Outer command-line surface.
//!
//! Only process-level options are parsed here; everything else is handed
//! verbatim to the command language.

use std::path::PathBuf;

use clap::Parser;

use crate::paint::ColorMode;

/// Branch switching with ids, annotations, statuses and history
#[derive(Parser, Debug)]
#[command(name = "brancher")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// When to use colors (overrides the config file)
    #[arg(long, value_enum)]
    pub color: Option<ColorMode>,

    /// Run as if started in this directory
    #[arg(long)]
    pub repo: Option<PathBuf>,

    /// Statement to run (see `brancher -h`)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("brancher").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn statement_arguments_pass_through() {
        let cli = parse(&["-d", "a", ":2", "-s", "wip"]);
        assert_eq!(cli.args, vec!["-d", "a", ":2", "-s", "wip"]);
        assert!(cli.color.is_none());
    }

    #[test]
    fn process_options_come_first() {
        let cli = parse(&["--color", "never", "--repo", "/tmp/r", "-li"]);
        assert_eq!(cli.color, Some(ColorMode::Never));
        assert_eq!(cli.repo, Some(PathBuf::from("/tmp/r")));
        assert_eq!(cli.args, vec!["-li"]);
    }

    #[test]
    fn help_is_left_to_the_command_language() {
        assert_eq!(parse(&["-h"]).args, vec!["-h"]);
        assert_eq!(parse(&["-"]).args, vec!["-"]);
        assert!(parse(&[]).args.is_empty());
    }
}
