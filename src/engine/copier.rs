//! Copy one file, carry over its metadata, then verify by digest.
//!
//! Verification is observational: a mismatching destination stays where it is and the
//! outcome is [`CopyStatus::Failed`]. Nothing is retried or rolled back.

use log::{error, info, warn};
use std::fs::{self, File, FileTimes, Metadata, OpenOptions};
use std::io;
use std::path::Path;

use crate::error::FileError;
use crate::{CopyOutcome, CopyStatus};

use super::hashing::{digest_hex, hash_file};

/// Copy `source` to `dest` (overwriting whatever is at `dest`, normally a reserved empty file)
/// and, when `verify` is set, compare SHA-256 digests of both.
pub fn copy_verified(source: &Path, dest: &Path, verify: bool) -> CopyOutcome {
    let outcome = |status, error| CopyOutcome {
        source_path: source.to_path_buf(),
        dest_path: dest.to_path_buf(),
        status,
        error,
    };

    if let Err(e) = copy_with_metadata(source, dest) {
        error!(
            "Copy failed: {} -> {}: {}",
            source.display(),
            dest.display(),
            e
        );
        if let Err(rm) = fs::remove_file(dest)
            && rm.kind() != io::ErrorKind::NotFound
        {
            warn!("Could not remove partial copy {}: {}", dest.display(), rm);
        }
        return outcome(
            CopyStatus::Failed,
            Some(FileError::Copy {
                from: source.to_path_buf(),
                to: dest.to_path_buf(),
                source: e,
            }),
        );
    }

    checked_outcome(source, dest, verify)
}

/// Outcome for a `dest` that has been written. A digest mismatch leaves `dest` in place.
fn checked_outcome(source: &Path, dest: &Path, verify: bool) -> CopyOutcome {
    let outcome = |status, error| CopyOutcome {
        source_path: source.to_path_buf(),
        dest_path: dest.to_path_buf(),
        status,
        error,
    };
    if !verify {
        info!("Copied (unverified): {}", dest.display());
        return outcome(CopyStatus::CopiedUnverified, None);
    }

    match verify_copy(source, dest) {
        Ok(()) => {
            info!("Copied: {} -> {}", source.display(), dest.display());
            outcome(CopyStatus::CopiedVerified, None)
        }
        Err(e) => {
            error!("{}", e);
            outcome(CopyStatus::Failed, Some(e))
        }
    }
}

/// Copy bytes, then timestamps and permissions. Metadata failures are logged, not returned.
pub(crate) fn copy_with_metadata(source: &Path, dest: &Path) -> io::Result<()> {
    let mut src = File::open(source)?;
    let meta = src.metadata()?;
    let mut out = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(dest)?;
    io::copy(&mut src, &mut out)?;

    if let Err(e) = out.set_times(file_times(&meta)) {
        warn!("Could not preserve timestamps on {}: {}", dest.display(), e);
    }
    drop(out);
    if let Err(e) = fs::set_permissions(dest, meta.permissions()) {
        warn!("Could not preserve permissions on {}: {}", dest.display(), e);
    }
    Ok(())
}

fn file_times(meta: &Metadata) -> FileTimes {
    let mut times = FileTimes::new();
    if let Ok(modified) = meta.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }
    times
}

/// Re-read both files fully and compare digests.
pub fn verify_copy(source: &Path, dest: &Path) -> Result<(), FileError> {
    let read_err = |path: &Path, e: io::Error| FileError::Copy {
        from: source.to_path_buf(),
        to: path.to_path_buf(),
        source: e,
    };
    let source_digest = hash_file(source).map_err(|e| read_err(source, e))?;
    let dest_digest = hash_file(dest).map_err(|e| read_err(dest, e))?;
    if source_digest == dest_digest {
        Ok(())
    } else {
        Err(FileError::VerificationMismatch {
            from: source.to_path_buf(),
            to: dest.to_path_buf(),
            source_digest: digest_hex(&source_digest),
            dest_digest: digest_hex(&dest_digest),
        })
    }
}
