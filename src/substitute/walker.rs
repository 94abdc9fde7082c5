//! Recursive enumeration of regular files under a root.
//!
//! Entries are visited in file-name order within each directory, so the
//! order is stable for a given tree. Symbolic links below the root are not
//! followed and are not visited; a root that is itself a file is visited
//! once.

use std::path::Path;

use tracing::trace;
use walkdir::WalkDir;

use crate::errors::{Result, SecretManagerError};

/// Call `visit` for every regular file at or under `root`.
///
/// Stops at the first error, whether from the walk or from `visit`.
pub fn walk<F>(root: &Path, mut visit: F) -> Result<()>
where
    F: FnMut(&Path) -> Result<()>,
{
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            SecretManagerError::ReadFailed {
                path,
                source: std::io::Error::from(e),
            }
        })?;

        if entry.file_type().is_file() {
            trace!(path = %entry.path().display(), "visit");
            visit(entry.path())?;
        }
    }
    Ok(())
}
