use crate::patterns::{IgnoreMatcher, normalize_separators};
use ignore::WalkBuilder;
use log::{debug, trace, warn};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

/// A file selected for the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Path relative to the scanned root, always `/`-separated.
    pub rel_path: String,
}

/// Collects the files under `project_root` that survive `matcher`.
///
/// Each directory lists its own files in sorted order before descending into
/// its subdirectories, also in sorted order. Directory symlinks are not
/// followed. Unreadable entries are logged and skipped. `exclude` names a
/// file (usually the output document) that is never collected.
pub fn collect_files(
    project_root: &Path,
    matcher: &IgnoreMatcher,
    exclude: Option<&Path>,
) -> Vec<SourceFile> {
    let mut builder = WalkBuilder::new(project_root);

    // Filtering is entirely up to the matcher.
    builder
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_path(files_before_dirs);

    let exclude = exclude.and_then(|p| fs::canonicalize(p).ok());
    let mut files = Vec::new();

    for result in builder.build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Error walking path: {err}");
                continue;
            }
        };

        let path = entry.path();
        // Directory symlinks are neither followed nor listed. Anything else,
        // including a dangling link, is a file and gets a section.
        if entry.depth() == 0
            || entry.file_type().is_some_and(|t| t.is_dir())
            || path.is_dir()
        {
            continue;
        }

        let rel_path = relative_path(project_root, path);

        if matcher.should_ignore(&rel_path) {
            trace!("Ignoring {rel_path}");
            continue;
        }

        if exclude.is_some() && fs::canonicalize(path).ok() == exclude {
            debug!("Skipping output file {rel_path}");
            continue;
        }

        files.push(SourceFile {
            path: path.to_path_buf(),
            rel_path,
        });
    }

    files
}

/// Path of `path` relative to `root`, `/`-separated.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    normalize_separators(&rel.to_string_lossy())
}

/// Sorts a directory's files ahead of its subdirectories, each by name.
///
/// `is_dir` follows links, so a symlink to a directory sorts with the
/// directories even though it is never descended.
fn files_before_dirs(a: &Path, b: &Path) -> Ordering {
    (a.is_dir(), a.file_name()).cmp(&(b.is_dir(), b.file_name()))
}
