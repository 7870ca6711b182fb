//! Source discovery: recursive walk collecting every file, in walk order.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::engine::tools::is_file_entry;

/// One result from a directory walk: either a file to consider or an error with optional path.
pub enum WalkOutcome {
    Ok(PathBuf),
    Err { msg: String, path: Option<PathBuf> },
}

/// Convert a walkdir result into [`WalkOutcome`]. Files and symlinks to files are kept;
/// directories, dangling links and other entries yield None.
pub fn to_outcome_walkdir(r: Result<walkdir::DirEntry, walkdir::Error>) -> Option<WalkOutcome> {
    match r {
        Ok(entry) if is_file_entry(entry.file_type(), entry.path()) => {
            Some(WalkOutcome::Ok(entry.into_path()))
        }
        Ok(_) => None,
        Err(err) => Some(WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        }),
    }
}

/// Files found under a root plus the entries the walk could not read.
#[derive(Debug, Default)]
pub struct Discovery {
    pub files: Vec<PathBuf>,
    pub errors: Vec<(PathBuf, String)>,
}

/// Walk `root` recursively (sorted by file name within each directory so runs are repeatable).
/// Unreadable entries are logged and recorded, never fatal. A root that is missing or is not
/// a directory yields no files and one recorded error.
pub fn discover_files(root: &Path, follow_links: bool) -> Discovery {
    if root.exists() && !root.is_dir() {
        log::warn!("Not a directory: {}", root.display());
        return Discovery {
            files: Vec::new(),
            errors: vec![(root.to_path_buf(), "not a directory".to_string())],
        };
    }
    let iter = WalkDir::new(root)
        .follow_links(follow_links)
        .sort_by_file_name()
        .into_iter()
        .filter_map(to_outcome_walkdir);
    run_walk_loop(root, iter)
}

/// Consume `iter` of [`WalkOutcome`], collecting files and recording errors.
/// When an error has no path, the last path seen is used for context.
pub fn run_walk_loop<I>(root: &Path, iter: I) -> Discovery
where
    I: Iterator<Item = WalkOutcome>,
{
    let mut discovery = Discovery::default();
    for outcome in iter {
        match outcome {
            WalkOutcome::Ok(path) => {
                log::debug!("Found file: {}", path.display());
                discovery.files.push(path);
            }
            WalkOutcome::Err { msg, path } => {
                let path = path.unwrap_or_else(|| {
                    PathBuf::from(format!(
                        "<no-path, last was {}>",
                        discovery
                            .files
                            .last()
                            .map(|p| p.display().to_string())
                            .unwrap_or_else(|| root.display().to_string())
                    ))
                });
                log::warn!("Cannot read {}: {}", path.display(), msg);
                discovery.errors.push((path, msg));
            }
        }
    }
    discovery
}
