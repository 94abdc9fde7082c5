//! Substitution of secrets and placeholders across a file tree.
//!
//! This module provides:
//! - Content- and file-level forward/reverse rewriting (`engine`)
//! - Deterministic recursive file enumeration (`walker`)
//! - `run`, which drives the engine over every file the walker yields

pub mod engine;
pub mod walker;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::{Result, SecretManagerError};
use crate::vault::SecretStore;

pub use engine::{apply, forward_apply, reverse_apply, Direction, Rewriter, Substitution};
pub use walker::walk;

/// How a multi-file run behaves.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub direction: Direction,
    /// Report what would change without writing anything.
    pub dry_run: bool,
    /// Skip files that are not UTF-8 instead of aborting the run.
    pub skip_binary: bool,
    /// Files never touched (the vault file itself, typically).
    pub exclude: Vec<PathBuf>,
}

impl RunOptions {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            dry_run: false,
            skip_binary: true,
            exclude: Vec::new(),
        }
    }
}

/// A file that had at least one replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: PathBuf,
    pub replacements: usize,
}

/// Outcome of a multi-file run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Files changed (or that would change on a dry run), in walk order.
    pub changed: Vec<FileChange>,
    /// Files skipped because they are not UTF-8 text.
    pub skipped: Vec<PathBuf>,
    /// `(file, id)` pairs for placeholders the store does not know.
    pub unknown_placeholders: Vec<(PathBuf, String)>,
    /// Regular files visited, excluded files not counted.
    pub files_visited: usize,
}

impl RunReport {
    /// Total replacements across all files.
    pub fn total_replacements(&self) -> usize {
        self.changed.iter().map(|c| c.replacements).sum()
    }
}

/// Apply `options.direction` to every regular file under `root`.
///
/// The first read or write failure aborts the run. Non-UTF-8 files are
/// skipped and recorded when `skip_binary` is set, and abort otherwise.
pub fn run(root: &Path, store: &SecretStore, options: &RunOptions) -> Result<RunReport> {
    let excluded: Vec<PathBuf> = options
        .exclude
        .iter()
        .filter_map(|p| fs::canonicalize(p).ok())
        .collect();

    let rewriter = Rewriter::new(options.direction, store)?;
    let mut report = RunReport::default();

    walk(root, |path| {
        if !excluded.is_empty() {
            if let Ok(canonical) = fs::canonicalize(path) {
                if excluded.contains(&canonical) {
                    debug!(path = %path.display(), "excluded");
                    return Ok(());
                }
            }
        }

        report.files_visited += 1;

        let result = match rewriter.apply_to_file(path, options.dry_run) {
            Ok(result) => result,
            Err(SecretManagerError::Encoding(path)) if options.skip_binary => {
                warn!(path = %path.display(), "skipping non-UTF-8 file");
                report.skipped.push(path);
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        for id in result.unknown_placeholders {
            report.unknown_placeholders.push((path.to_path_buf(), id));
        }
        if result.replacements > 0 {
            report.changed.push(FileChange {
                path: path.to_path_buf(),
                replacements: result.replacements,
            });
        }
        Ok(())
    })?;

    debug!(
        root = %root.display(),
        visited = report.files_visited,
        changed = report.changed.len(),
        skipped = report.skipped.len(),
        "run finished"
    );
    Ok(report)
}
