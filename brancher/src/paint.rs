//! Terminal color helpers.

use std::io::IsTerminal;

use colored::Colorize;
use serde::{Deserialize, Serialize};

/// When to emit ANSI colors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Applies styles only when colors are enabled.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub fn new(mode: ColorMode) -> Self {
        let enabled = match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        };
        if enabled {
            // `colored` consults NO_COLOR/CLICOLOR itself; the mode decides here.
            colored::control::set_override(true);
        }
        Self { enabled }
    }

    #[cfg(test)]
    pub const fn plain() -> Self {
        Self { enabled: false }
    }

    /// The checked-out branch.
    pub fn current(self, s: &str) -> String {
        if self.enabled {
            s.green().bold().to_string()
        } else {
            s.to_string()
        }
    }

    /// Closed branches and deleted history entries.
    pub fn dim(self, s: &str) -> String {
        if self.enabled {
            s.dimmed().to_string()
        } else {
            s.to_string()
        }
    }

    /// Status tags.
    pub fn tag(self, s: &str) -> String {
        if self.enabled {
            s.yellow().to_string()
        } else {
            s.to_string()
        }
    }

    /// Ids.
    pub fn id(self, s: &str) -> String {
        if self.enabled {
            s.cyan().to_string()
        } else {
            s.to_string()
        }
    }
}
