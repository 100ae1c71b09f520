//! Running a parsed statement against the store, history and gateway.

use std::io::Write;
use std::path::PathBuf;

use tracing::debug;

use super::parse::{BranchRef, Composite, Field, Statement};
use super::tokens::ID_MARKER;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::history::History;
use crate::paint::Painter;
use crate::prompt::Prompter;
use crate::store::{
    metadata_path, render_line, render_names, render_records, RenderOptions, Store,
};
use crate::vcs::Vcs;

pub const USAGE: &str = "\
Usage: brancher [--color <WHEN>] [--repo <PATH>] [STATEMENT]

Switching:
  (nothing)              pick a branch from a menu and switch to it
  <name> | :<id>         switch to a branch
  -                      switch to the branch you were on before
  -H, --history          pick a branch from the history menu

Branches and metadata (combine freely):
  -b, --branch [<name>|:<id>]   target an existing branch (menu if omitted)
  -n, --new [<name>]            create a branch and switch to it
  -a, --annotate [<text>...]    set the annotation
  -s, --status [<text>...]      set the status (\"closed\" hides the branch)
  -c, --close                   set the status to \"closed\"
  -I, --id [<id>]               give the branch a new id

Deleting:
  -d, --delete [<name>|:<id>...]        delete branches (menu if none given)
  -D, --force-delete [<name>|:<id>...]  same, even if unmerged

Listing:
  -l, --list             list branches
  -la, --list-all        list branches, closed ones included
  -li, --list-history    list history entries
  -rl, --raw-list        print branch names only
  -rh, --raw-history     print history entries only
  -C, --current          show the current branch
      --reindex          renumber ids

  -h, --help             print this help
  -V, --version          print the version
";

/// Parse an id answer typed at a prompt; the id marker is optional.
fn parse_id(text: &str) -> Option<u32> {
    let text = text.trim();
    text.strip_prefix(ID_MARKER).unwrap_or(text).parse().ok()
}

/// Executes one statement.
///
/// The store is loaded on first use and written back only by
/// [`Resolver::finish`].
pub struct Resolver<'a> {
    vcs: &'a dyn Vcs,
    prompter: &'a mut dyn Prompter,
    out: &'a mut dyn Write,
    painter: Painter,
    trunk: Vec<String>,
    history_limit: usize,
    show_closed: bool,
    control_dir: Option<PathBuf>,
    store: Option<Store>,
}

impl<'a> Resolver<'a> {
    pub fn new(
        vcs: &'a dyn Vcs,
        prompter: &'a mut dyn Prompter,
        out: &'a mut dyn Write,
        config: &Config,
        painter: Painter,
    ) -> Self {
        Self {
            vcs,
            prompter,
            out,
            painter,
            trunk: config.trunk_branches.clone(),
            history_limit: config.history_limit,
            show_closed: config.show_closed,
            control_dir: None,
            store: None,
        }
    }

    fn control_dir(&mut self) -> Result<PathBuf> {
        if let Some(dir) = &self.control_dir {
            return Ok(dir.clone());
        }
        let dir = self.vcs.control_dir()?;
        self.control_dir = Some(dir.clone());
        Ok(dir)
    }

    fn store(&mut self) -> Result<&mut Store> {
        let store = match self.store.take() {
            Some(store) => store,
            None => {
                let path = metadata_path(&self.control_dir()?);
                let live = self.vcs.list_branches()?;
                Store::open(path, self.trunk.clone(), &live)?
            }
        };
        Ok(self.store.insert(store))
    }

    fn history(&mut self) -> Result<History> {
        Ok(History::in_control_dir(&self.control_dir()?, self.history_limit))
    }

    /// Write the store back if anything changed.
    pub fn finish(&mut self) -> Result<()> {
        if let Some(store) = self.store.as_mut() {
            debug!(dirty = store.is_dirty(), records = store.records().len(), "finishing");
            if store.persist()? {
                debug!(path = %store.path().display(), "metadata saved");
            }
        }
        Ok(())
    }

    pub fn run(&mut self, statement: Statement) -> Result<()> {
        debug!(?statement, "running");
        match statement {
            Statement::Composite(fields) => self.composite(fields),
            Statement::Back => {
                let target = self.history()?.latest()?;
                self.switch(&target)
            }
            Statement::Delete { force, targets } => self.delete(force, &targets),
            Statement::List { show_closed } => {
                let opts = RenderOptions {
                    show_closed: show_closed || self.show_closed,
                    show_deleted: false,
                };
                self.list(opts)
            }
            Statement::ListHistory => {
                let entries = self.history()?.read()?;
                let opts = RenderOptions {
                    show_closed: true,
                    show_deleted: true,
                };
                let lines = self.history_lines(&entries, opts)?;
                self.print(&lines)
            }
            Statement::RawList => {
                let names = self.vcs.list_branches()?;
                self.print(&names)
            }
            Statement::RawHistory => {
                let entries = self.history()?.read()?;
                self.print(&entries)
            }
            Statement::HistoryMenu => {
                let entries = self.history()?.read()?;
                let opts = RenderOptions {
                    show_closed: true,
                    show_deleted: false,
                };
                let lines = self.history_lines(&entries, opts)?;
                self.print(&lines)?;
                let target = self.pick()?;
                self.switch(&target)
            }
            Statement::Current => {
                let current = self.vcs.current_branch()?;
                self.show(&current)
            }
            Statement::Reindex => {
                self.store()?.reindex()?;
                self.list(RenderOptions {
                    show_closed: true,
                    show_deleted: false,
                })
            }
            Statement::Help => Ok(write!(self.out, "{USAGE}")?),
            Statement::Version => Ok(writeln!(
                self.out,
                "brancher {}",
                env!("CARGO_PKG_VERSION")
            )?),
        }
    }

    fn composite(&mut self, fields: Composite) -> Result<()> {
        if fields.branch.is_some() && fields.new_branch.is_some() {
            return Err(Error::BranchAndNew);
        }

        let edits = fields.edits_metadata();
        if !edits {
            if let Some(branch) = &fields.branch {
                let target = self.branch_target(branch)?;
                return self.switch(&target);
            }
        }

        let target = match (&fields.branch, fields.new_branch) {
            (Some(branch), _) => Some(self.branch_target(branch)?),
            (None, Some(new_branch)) => {
                let name = match new_branch {
                    Field::Given(name) => name,
                    Field::Wanted => self.ask_nonempty("new branch name: ")?,
                };
                self.create(&name)?;
                Some(name)
            }
            (None, None) => None,
        };

        if !edits {
            return Ok(());
        }

        let target = match target {
            Some(target) => target,
            None => self.menu()?,
        };

        if let Some(field) = fields.annotation {
            let text = match field {
                Field::Given(text) => text,
                Field::Wanted => self.prompter.ask(&format!("annotation for {target}: "))?,
            };
            self.store()?.set_annotation(&target, &text)?;
        }
        if let Some(field) = fields.status {
            let text = match field {
                Field::Given(text) => text,
                Field::Wanted => self.prompter.ask(&format!("status for {target}: "))?,
            };
            self.store()?.set_status(&target, &text)?;
        }
        if let Some(field) = fields.id {
            let id = match field {
                Field::Given(id) => id,
                Field::Wanted => {
                    let answer = self.prompter.ask(&format!("new id for {target}: "))?;
                    parse_id(&answer).ok_or(Error::IdNotInteger(answer))?
                }
            };
            self.store()?.set_id(&target, id)?;
        }

        self.show(&target)
    }

    fn branch_target(&mut self, branch: &Field<BranchRef>) -> Result<String> {
        match branch {
            Field::Given(reference) => self.resolve_ref(reference),
            Field::Wanted => self.menu(),
        }
    }

    fn resolve_ref(&mut self, reference: &BranchRef) -> Result<String> {
        match reference {
            BranchRef::Name(name) => Ok(name.clone()),
            BranchRef::Id(text) => {
                let id = text
                    .parse::<u32>()
                    .map_err(|_| Error::BadId(format!("{ID_MARKER}{text}")))?;
                Ok(self.store()?.by_id(id)?.name.clone())
            }
        }
    }

    fn ask_nonempty(&mut self, question: &str) -> Result<String> {
        let answer = self.prompter.ask(question)?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(Error::Aborted);
        }
        Ok(answer.to_string())
    }

    /// Ask for one id and return its branch name.
    fn pick(&mut self) -> Result<String> {
        let answer = self.ask_nonempty("id: ")?;
        let id = parse_id(&answer).ok_or_else(|| Error::BadId(answer.clone()))?;
        Ok(self.store()?.by_id(id)?.name.clone())
    }

    /// Show the listing and let the user pick a branch.
    fn menu(&mut self) -> Result<String> {
        self.list(RenderOptions {
            show_closed: self.show_closed,
            show_deleted: false,
        })?;
        self.pick()
    }

    fn list(&mut self, opts: RenderOptions) -> Result<()> {
        let current = self.vcs.current_branch()?;
        let painter = self.painter;
        let lines = render_records(self.store()?, &current, opts, painter)?;
        self.print(&lines)
    }

    fn history_lines(&mut self, entries: &[String], opts: RenderOptions) -> Result<Vec<String>> {
        let current = self.vcs.current_branch()?;
        let painter = self.painter;
        Ok(render_names(self.store()?, entries, &current, opts, painter))
    }

    /// Print the record for `name`.
    fn show(&mut self, name: &str) -> Result<()> {
        let current = self.vcs.current_branch()?;
        let painter = self.painter;
        let line = match self.store()?.by_name(name) {
            Some(record) => render_line(record, &current, painter),
            None => return Err(Error::UnknownBranch(name.to_string())),
        };
        Ok(writeln!(self.out, "{line}")?)
    }

    fn print(&mut self, lines: &[String]) -> Result<()> {
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    /// Check out `target`, recording the branch being left.
    fn switch(&mut self, target: &str) -> Result<()> {
        let leaving = self.vcs.current_branch()?;
        self.vcs.switch_to(target)?;
        if leaving != target {
            self.history()?.append(&leaving)?;
        }
        Ok(())
    }

    fn create(&mut self, name: &str) -> Result<()> {
        let leaving = self.vcs.current_branch()?;
        self.vcs.create_and_switch(name)?;
        self.history()?.append(&leaving)?;

        // Pick up the new branch if the store is already in memory.
        if let Some(store) = self.store.as_mut() {
            let live = self.vcs.list_branches()?;
            store.reconcile(&live);
        }
        Ok(())
    }

    fn delete(&mut self, force: bool, targets: &[BranchRef]) -> Result<()> {
        let names = if targets.is_empty() {
            self.list(RenderOptions {
                show_closed: true,
                show_deleted: false,
            })?;
            let answer = self.ask_nonempty("ids to delete: ")?;
            let mut names = Vec::new();
            for word in answer.split_whitespace() {
                let id = parse_id(word).ok_or_else(|| Error::BadId(word.to_string()))?;
                names.push(self.store()?.by_id(id)?.name.clone());
            }
            names
        } else {
            let mut names = Vec::new();
            for target in targets {
                names.push(self.resolve_ref(target)?);
            }
            names
        };

        for name in &names {
            self.vcs.delete_branch(name, force)?;
            if let Some(store) = self.store.as_mut() {
                store.forget(name);
            }
        }
        Ok(())
    }
}
