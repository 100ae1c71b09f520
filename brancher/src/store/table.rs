//! Metadata store kept in step with the live branch set.

use std::cell::OnceCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::record::{check_unique_ids, sort_records, BranchRecord};
use crate::error::{Error, Result};

/// Id reserved for the trunk branch.
pub const TRUNK_ID: u32 = 0;

/// Owner of every [`BranchRecord`].
///
/// Changes are made in memory and written back by [`Store::persist`] at most
/// once per process.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    trunk: Vec<String>,
    records: Vec<BranchRecord>,
    /// id -> position in `records`, built on first lookup.
    id_index: OnceCell<HashMap<u32, usize>>,
    dirty: bool,
    persisted: bool,
}

impl Store {
    /// Load the table at `path` and reconcile it with `live`.
    ///
    /// A missing file is synthesized from the live branches.
    pub fn open(path: impl Into<PathBuf>, trunk: Vec<String>, live: &[String]) -> Result<Self> {
        let path = path.into();
        let mut store = Self {
            path,
            trunk,
            records: Vec::new(),
            id_index: OnceCell::new(),
            dirty: false,
            persisted: false,
        };

        if store.path.exists() {
            store.records = read_table(&store.path)?;
            debug!(path = %store.path.display(), records = store.records.len(), "loaded metadata");
            store.reconcile(live);
        } else {
            store.synthesize(live);
        }

        Ok(store)
    }

    /// Build a fresh table: trunk gets id 0, the rest count up from 1.
    fn synthesize(&mut self, live: &[String]) {
        info!(branches = live.len(), "no metadata file, synthesizing");
        let mut next_id = 1;
        let mut trunk_taken = false;

        for name in live {
            let id = if !trunk_taken && self.is_trunk_name(name) {
                trunk_taken = true;
                TRUNK_ID
            } else {
                let id = next_id;
                next_id += 1;
                id
            };
            self.records.push(BranchRecord::new(name.clone(), id, 0));
        }

        self.touch();
    }

    /// Drop records for vanished branches and add records for new ones.
    ///
    /// Returns whether anything changed. Calling it again with the same live
    /// set is a no-op.
    pub fn reconcile(&mut self, live: &[String]) -> bool {
        let live_set: HashSet<&str> = live.iter().map(String::as_str).collect();

        let before = self.records.len();
        self.records.retain(|r| live_set.contains(r.name.as_str()));
        let removed = before - self.records.len();

        let mut added = 0;
        for name in live {
            if self.records.iter().any(|r| &r.name == name) {
                continue;
            }
            let id = if self.is_trunk_name(name) && !self.id_in_use(TRUNK_ID) {
                TRUNK_ID
            } else {
                self.free_id()
            };
            let recency = self.records.iter().map(|r| r.recency).max().map_or(0, |m| m + 1);
            debug!(branch = %name, id, recency, "new branch");
            self.records.push(BranchRecord::new(name.clone(), id, recency));
            added += 1;
        }

        if removed + added > 0 {
            info!(removed, added, "reconciled metadata");
            self.touch();
            true
        } else {
            false
        }
    }

    fn is_trunk_name(&self, name: &str) -> bool {
        self.trunk.iter().any(|t| t == name)
    }

    fn id_in_use(&self, id: u32) -> bool {
        self.records.iter().any(|r| r.id == id)
    }

    /// Smallest unused id, searching from 1.
    fn free_id(&self) -> u32 {
        let used: HashSet<u32> = self.records.iter().map(|r| r.id).collect();
        (1..).find(|id| !used.contains(id)).unwrap_or(u32::MAX)
    }

    /// Mark the table stale and drop derived indices.
    fn touch(&mut self) {
        self.dirty = true;
        self.id_index.take();
    }

    fn index(&self) -> &HashMap<u32, usize> {
        self.id_index.get_or_init(|| {
            self.records
                .iter()
                .enumerate()
                .map(|(pos, r)| (r.id, pos))
                .collect()
        })
    }

    pub fn by_id(&self, id: u32) -> Result<&BranchRecord> {
        self.index()
            .get(&id)
            .map(|&pos| &self.records[pos])
            .ok_or_else(|| Error::BadId(id.to_string()))
    }

    pub fn by_name(&self, name: &str) -> Option<&BranchRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.records
            .iter()
            .position(|r| r.name == name)
            .ok_or_else(|| Error::UnknownBranch(name.to_string()))
    }

    pub fn set_annotation(&mut self, name: &str, annotation: &str) -> Result<()> {
        let pos = self.position(name)?;
        annotation.clone_into(&mut self.records[pos].annotation);
        self.touch();
        Ok(())
    }

    pub fn set_status(&mut self, name: &str, status: &str) -> Result<()> {
        let pos = self.position(name)?;
        status.clone_into(&mut self.records[pos].status);
        self.touch();
        Ok(())
    }

    /// Give `name` a new id, refusing no-ops, the trunk id and collisions.
    pub fn set_id(&mut self, name: &str, id: u32) -> Result<()> {
        let pos = self.position(name)?;
        let record = &self.records[pos];

        if record.id == id {
            return Err(Error::AlreadyHasId {
                branch: name.to_string(),
                id,
            });
        }
        if record.id == TRUNK_ID {
            return Err(Error::TrunkIdPinned(name.to_string()));
        }
        if id == TRUNK_ID {
            return Err(Error::TrunkIdReserved);
        }
        if let Some(holder) = self.records.iter().find(|r| r.id == id) {
            return Err(Error::IdConflict {
                id,
                holder: holder.name.clone(),
            });
        }

        self.records[pos].id = id;
        self.touch();
        Ok(())
    }

    /// Remove the record for a deleted branch.
    pub fn forget(&mut self, name: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.name != name);
        let removed = self.records.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    /// Renumber every non-trunk record from 1.
    ///
    /// Closed records get the smallest ids, then open ones from least to most
    /// recent, so the most recent branches carry the largest ids.
    pub fn reindex(&mut self) -> Result<()> {
        check_unique_ids(&self.records)?;

        let mut order: Vec<usize> = (0..self.records.len())
            .filter(|&pos| self.records[pos].id != TRUNK_ID)
            .collect();
        order.sort_by(|&a, &b| {
            let (a, b) = (&self.records[a], &self.records[b]);
            b.is_closed()
                .cmp(&a.is_closed())
                .then(a.recency.cmp(&b.recency))
                .then(a.id.cmp(&b.id))
        });

        for (id, pos) in (1..).zip(order) {
            self.records[pos].id = id;
        }

        info!(records = self.records.len(), "reindexed");
        self.touch();
        Ok(())
    }

    /// Records in display order.
    pub fn sorted(&self) -> Result<Vec<&BranchRecord>> {
        let mut records: Vec<&BranchRecord> = self.records.iter().collect();
        sort_records(&mut records)?;
        Ok(records)
    }

    pub fn records(&self) -> &[BranchRecord] {
        &self.records
    }

    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the table if it changed. Returns whether a write happened.
    ///
    /// Only the first call in a process can write.
    pub fn persist(&mut self) -> Result<bool> {
        if !self.dirty || self.persisted {
            return Ok(false);
        }

        let rows = self.sorted()?;
        write_table(&self.path, &rows)?;
        debug!(path = %self.path.display(), records = rows.len(), "wrote metadata");

        self.dirty = false;
        self.persisted = true;
        Ok(true)
    }
}

fn read_table(path: &Path) -> Result<Vec<BranchRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records: Vec<BranchRecord> = Vec::new();

    for row in reader.deserialize() {
        let record: BranchRecord = row.map_err(|e| Error::BadMetadata(e.to_string()))?;
        if records.iter().any(|r| r.name == record.name) {
            return Err(Error::BadMetadata(format!(
                "branch '{}' listed twice",
                record.name
            )));
        }
        records.push(record);
    }

    Ok(records)
}

/// Write the whole table to a sibling file and rename it into place.
fn write_table(path: &Path, rows: &[&BranchRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp = path.with_extension("csv.tmp");
    {
        let mut writer = csv::Writer::from_path(&tmp)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}
