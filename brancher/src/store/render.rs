//! Human-readable listing of records.

use super::record::BranchRecord;
use super::table::Store;
use crate::error::Result;
use crate::paint::Painter;

/// What to include in a listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Include branches whose status is `closed`.
    pub show_closed: bool,
    /// Include names that have no record, as placeholders.
    pub show_deleted: bool,
}

/// One line: marker, id, name, then `[status]` and annotation when set.
pub fn render_line(record: &BranchRecord, current: &str, painter: Painter) -> String {
    let is_current = record.name == current;
    let marker = if is_current { "*" } else { " " };
    let id = format!("{:>3}", record.id);

    let mut tail = String::new();
    if !record.status.is_empty() {
        tail.push_str(&format!(" [{}]", record.status));
    }
    if !record.annotation.is_empty() {
        tail.push(' ');
        tail.push_str(&record.annotation);
    }

    if is_current {
        format!(
            "{} {} {}{}",
            painter.current(marker),
            painter.id(&id),
            painter.current(&record.name),
            painter.tag(&tail)
        )
    } else if record.is_closed() {
        painter.dim(&format!("{marker} {id} {}{tail}", record.name))
    } else {
        format!("{marker} {} {}{}", painter.id(&id), record.name, painter.tag(&tail))
    }
}

fn render_deleted(name: &str, painter: Painter) -> String {
    painter.dim(&format!("    - {name} (deleted)"))
}

/// Every record in display order.
pub fn render_records(
    store: &Store,
    current: &str,
    opts: RenderOptions,
    painter: Painter,
) -> Result<Vec<String>> {
    Ok(store
        .sorted()?
        .into_iter()
        .filter(|r| opts.show_closed || !r.is_closed())
        .map(|r| render_line(r, current, painter))
        .collect())
}

/// One line per name, in the given order; used for history entries.
pub fn render_names(
    store: &Store,
    names: &[String],
    current: &str,
    opts: RenderOptions,
    painter: Painter,
) -> Vec<String> {
    names
        .iter()
        .filter_map(|name| match store.by_name(name) {
            Some(r) if r.is_closed() && !opts.show_closed => None,
            Some(r) => Some(render_line(r, current, painter)),
            None if opts.show_deleted => Some(render_deleted(name, painter)),
            None => None,
        })
        .collect()
}
