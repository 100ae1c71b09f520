//! Asking the user for a line of text.

use std::io::{self, BufRead, Write};

use crate::error::{Error, Result};

/// Source of interactive answers.
pub trait Prompter {
    /// Show `question` and return the answer without its line ending.
    ///
    /// End of input aborts with [`Error::Aborted`].
    fn ask(&mut self, question: &str) -> Result<String>;
}

/// Reads answers from stdin, printing questions on stderr.
#[derive(Debug, Default)]
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn ask(&mut self, question: &str) -> Result<String> {
        let mut stderr = io::stderr().lock();
        write!(stderr, "{question}")?;
        stderr.flush()?;

        let mut line = String::new();
        let read = match io::stdin().lock().read_line(&mut line) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => return Err(Error::Aborted),
            Err(e) => return Err(e.into()),
        };
        if read == 0 {
            writeln!(stderr)?;
            return Err(Error::Aborted);
        }

        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }
}

#[cfg(test)]
pub use scripted::ScriptedPrompter;
