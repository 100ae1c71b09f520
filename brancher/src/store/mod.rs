//! Persistent per-branch metadata.

mod record;
mod render;
mod table;

pub use record::CLOSED;
pub use render::{render_line, render_names, render_records, RenderOptions};
pub use table::Store;

use std::path::{Path, PathBuf};

/// Directory, under the repository's control dir, holding our files.
pub const DATA_DIR: &str = "brancher";

/// Location of the metadata table.
pub fn metadata_path(control_dir: &Path) -> PathBuf {
    control_dir.join(DATA_DIR).join("branches.csv")
}
