//! Bulk trash/relocate of orphan files.
//!
//! Each path is re-checked right before it is touched; paths that vanished since the scan are
//! reported and skipped. Relocation never overwrites an existing file, including one that
//! appears between the scan and the move. Callers rescan afterwards to refresh the orphan list.

use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::engine::copier::copy_with_metadata;
use crate::error::FileError;
use crate::{BatchReport, OperationOutcome, OrphanAction};

/// Apply `action` to every path in order. Relocate without a (non-empty) destination does nothing
/// and returns [`BatchReport::NoDestination`].
pub fn apply_orphan_action(
    action: OrphanAction,
    orphan_paths: &[PathBuf],
    destination: Option<&Path>,
) -> BatchReport {
    let outcomes = match action {
        OrphanAction::Trash => orphan_paths.iter().map(|p| trash_one(p)).collect(),
        OrphanAction::Relocate => {
            let Some(dest_dir) = destination.filter(|d| !d.as_os_str().is_empty()) else {
                warn!("No destination selected; nothing moved");
                return BatchReport::NoDestination;
            };
            if let Err(source) = fs::create_dir_all(dest_dir) {
                warn!("Cannot create {}: {}", dest_dir.display(), source);
                let message = source.to_string();
                return BatchReport::Applied(
                    orphan_paths
                        .iter()
                        .map(|p| OperationOutcome {
                            path: p.clone(),
                            destination: None,
                            error: Some(FileError::DirectoryCreate {
                                path: dest_dir.to_path_buf(),
                                source: io::Error::new(source.kind(), message.clone()),
                            }),
                        })
                        .collect(),
                );
            }
            orphan_paths
                .iter()
                .map(|p| relocate_one(p, dest_dir))
                .collect()
        }
    };
    BatchReport::Applied(outcomes)
}

fn vanished(path: &Path) -> Option<OperationOutcome> {
    if path.exists() {
        return None;
    }
    warn!("File no longer exists: {}", path.display());
    Some(OperationOutcome {
        path: path.to_path_buf(),
        destination: None,
        error: Some(FileError::Vanished {
            path: path.to_path_buf(),
        }),
    })
}

fn trash_one(path: &Path) -> OperationOutcome {
    if let Some(outcome) = vanished(path) {
        return outcome;
    }
    let error = match trash::delete(path) {
        Ok(()) => {
            info!("Moved to trash: {}", path.display());
            None
        }
        Err(e) => {
            warn!("Cannot trash {}: {}", path.display(), e);
            Some(FileError::Trash {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
    };
    OperationOutcome {
        path: path.to_path_buf(),
        destination: None,
        error,
    }
}

fn relocate_one(path: &Path, dest_dir: &Path) -> OperationOutcome {
    if let Some(outcome) = vanished(path) {
        return outcome;
    }
    let failed = |error: FileError| {
        warn!("{}", error);
        OperationOutcome {
            path: path.to_path_buf(),
            destination: None,
            error: Some(error),
        }
    };
    let Some(name) = path.file_name() else {
        return failed(FileError::Vanished {
            path: path.to_path_buf(),
        });
    };
    let target = dest_dir.join(name);
    match move_file(path, &target) {
        Ok(()) => {
            info!("Moved {} -> {}", path.display(), target.display());
            OperationOutcome {
                path: path.to_path_buf(),
                destination: Some(target),
                error: None,
            }
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            failed(FileError::DestinationExists { path: target })
        }
        Err(source) => failed(FileError::Move {
            from: path.to_path_buf(),
            to: target,
            source,
        }),
    }
}

/// Move without ever replacing an existing `to`: hard-link then unlink, or copy into a
/// `create_new` target where links are unsupported (FAT/exFAT cards, other devices).
/// An occupied `to` always fails with `AlreadyExists`.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::hard_link(from, to) {
        Ok(()) => fs::remove_file(from),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(e),
        Err(e) => {
            debug!("Cannot link {} ({}), copying", from.display(), e);
            copy_then_remove(from, to)
        }
    }
}

/// Claim `to` with `create_new`, copy bytes and metadata into it, then remove `from`.
fn copy_then_remove(from: &Path, to: &Path) -> io::Result<()> {
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(to)?;
    if let Err(e) = copy_with_metadata(from, to) {
        if let Err(rm) = fs::remove_file(to) {
            warn!("Could not remove partial copy {}: {}", to.display(), rm);
        }
        return Err(e);
    }
    fs::remove_file(from)
}
