//! In-memory gateway for headless tests.

use std::cell::RefCell;
use std::path::PathBuf;

use super::Vcs;
use crate::error::{Error, Result};

#[derive(Debug)]
pub struct FakeVcs {
    pub branches: RefCell<Vec<String>>,
    pub current: RefCell<String>,
    pub control_dir: PathBuf,
    /// Commands issued, in order, as `verb name`.
    pub calls: RefCell<Vec<String>>,
    /// Branch names whose switch/delete fails with exit code 1.
    pub failing: Vec<String>,
}

impl FakeVcs {
    pub fn new(control_dir: impl Into<PathBuf>, branches: &[&str], current: &str) -> Self {
        Self {
            branches: RefCell::new(branches.iter().map(ToString::to_string).collect()),
            current: RefCell::new(current.to_string()),
            control_dir: control_dir.into(),
            calls: RefCell::new(Vec::new()),
            failing: Vec::new(),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn check(&self, verb: &str, name: &str) -> Result<()> {
        self.calls.borrow_mut().push(format!("{verb} {name}"));
        if self.failing.iter().any(|f| f == name) {
            return Err(Error::CommandFailed {
                command: format!("git {verb} {name}"),
                code: 1,
            });
        }
        Ok(())
    }
}

impl Vcs for FakeVcs {
    fn list_branches(&self) -> Result<Vec<String>> {
        Ok(self.branches.borrow().clone())
    }

    fn current_branch(&self) -> Result<String> {
        Ok(self.current.borrow().clone())
    }

    fn switch_to(&self, name: &str) -> Result<()> {
        self.check("checkout", name)?;
        if !self.branches.borrow().iter().any(|b| b == name) {
            return Err(Error::CommandFailed {
                command: format!("git checkout {name}"),
                code: 1,
            });
        }
        *self.current.borrow_mut() = name.to_string();
        Ok(())
    }

    fn create_and_switch(&self, name: &str) -> Result<()> {
        self.check("checkout -b", name)?;
        self.branches.borrow_mut().push(name.to_string());
        *self.current.borrow_mut() = name.to_string();
        Ok(())
    }

    fn delete_branch(&self, name: &str, force: bool) -> Result<()> {
        self.check(if force { "branch -D" } else { "branch -d" }, name)?;
        self.branches.borrow_mut().retain(|b| b != name);
        Ok(())
    }

    fn control_dir(&self) -> Result<PathBuf> {
        Ok(self.control_dir.clone())
    }
}
