//! Per-branch metadata record and its ordering.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Status value that hides a branch from default listings and sorts it last.
pub const CLOSED: &str = "closed";

/// Metadata kept for one branch.
///
/// Field order is the column order of the metadata file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRecord {
    /// Branch name, unique among live records.
    #[serde(rename = "branch")]
    pub name: String,
    /// Stable numeric id; 0 is reserved for the trunk branch.
    pub id: u32,
    /// Tie-break rank, higher means more recently introduced.
    pub recency: u64,
    /// Free-text note.
    pub annotation: String,
    /// Free-text status; see [`CLOSED`].
    pub status: String,
}

impl BranchRecord {
    pub fn new(name: impl Into<String>, id: u32, recency: u64) -> Self {
        Self {
            name: name.into(),
            id,
            recency,
            annotation: String::new(),
            status: String::new(),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.status == CLOSED
    }

    /// Compare two records: open before closed, then recency, then id.
    ///
    /// `Equal` only happens for records sharing recency and id, which the
    /// store never produces.
    pub fn order(&self, other: &Self) -> Ordering {
        self.is_closed()
            .cmp(&other.is_closed())
            .then(self.recency.cmp(&other.recency))
            .then(self.id.cmp(&other.id))
    }
}

/// Fail with [`Error::DuplicateId`] if two records share an id.
pub fn check_unique_ids<'a>(records: impl IntoIterator<Item = &'a BranchRecord>) -> Result<()> {
    let mut seen: HashMap<u32, &str> = HashMap::new();
    for record in records {
        if let Some(first) = seen.insert(record.id, &record.name) {
            return Err(Error::DuplicateId {
                id: record.id,
                first: first.to_string(),
                second: record.name.clone(),
            });
        }
    }
    Ok(())
}

/// Sort records by [`BranchRecord::order`].
///
/// Duplicate ids would make the order ambiguous, so they are rejected before
/// sorting.
pub fn sort_records(records: &mut [&BranchRecord]) -> Result<()> {
    check_unique_ids(records.iter().copied())?;
    records.sort_by(|a, b| a.order(b));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str, id: u32, recency: u64, status: &str) -> BranchRecord {
        BranchRecord {
            status: status.to_string(),
            ..BranchRecord::new(name, id, recency)
        }
    }

    #[test]
    fn closed_sorts_after_open() {
        let open = rec("a", 9, 9, "");
        let closed = rec("b", 1, 0, CLOSED);
        assert_eq!(open.order(&closed), Ordering::Less);
        assert_eq!(closed.order(&open), Ordering::Greater);
    }

    #[test]
    fn recency_then_id() {
        let old = rec("a", 5, 1, "wip");
        let new = rec("b", 2, 2, "");
        assert_eq!(old.order(&new), Ordering::Less);

        let low = rec("c", 1, 3, "");
        let high = rec("d", 2, 3, "");
        assert_eq!(low.order(&high), Ordering::Less);
    }

    #[test]
    fn ordering_is_strict_for_distinct_ids() {
        let records: Vec<_> = (0..6)
            .map(|i| rec(&format!("b{i}"), i, u64::from(i % 3), if i % 2 == 0 { CLOSED } else { "" }))
            .collect();

        for a in &records {
            for b in &records {
                if a.id == b.id {
                    continue;
                }
                assert_ne!(a.order(b), Ordering::Equal);
                assert_eq!(a.order(b), b.order(a).reverse());
            }
        }
    }

    #[test]
    fn sort_rejects_duplicate_ids() {
        let a = rec("a", 1, 0, "");
        let b = rec("b", 1, 0, "");
        let mut refs = vec![&a, &b];
        let err = sort_records(&mut refs).unwrap_err();
        assert!(matches!(err, Error::DuplicateId { id: 1, .. }));
    }

    #[test]
    fn sort_orders_listing() {
        let a = rec("a", 0, 0, "");
        let b = rec("b", 1, 2, CLOSED);
        let c = rec("c", 2, 1, "");
        let mut refs = vec![&b, &c, &a];
        sort_records(&mut refs).unwrap();
        let names: Vec<_> = refs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c", "b"]);
    }
}
