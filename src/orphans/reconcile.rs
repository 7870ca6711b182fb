//! Sibling matching between JPEGs and Canon RAW files.
//!
//! A `.cr3` is an orphan when no `.jpg` anywhere in the scanned tree shares its base name.
//! Base names compare case-insensitively; only `.jpg` (not `.jpeg`) counts as the sibling.

use anyhow::{Result, bail};
use jwalk::{Parallelism, WalkDir};
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::OrphanScan;
use crate::engine::tools::{base_name_key, has_extension, is_file_entry};
use crate::utils::config::Extensions;

/// JPEG and CR3 paths found under one root.
#[derive(Debug, Default)]
pub struct SiblingSets {
    pub jpegs: Vec<PathBuf>,
    pub cr3s: Vec<PathBuf>,
}

/// Partition the files under `root` into JPEG and CR3 sets. Symlinks to files count as files.
/// Unreadable entries are logged and skipped.
pub fn collect_sibling_sets(root: &Path) -> SiblingSets {
    let mut sets = SiblingSets::default();
    let walk = WalkDir::new(root)
        .skip_hidden(false)
        .sort(true)
        .parallelism(Parallelism::RayonDefaultPool {
            busy_timeout: Duration::from_secs(60),
        });
    for entry in walk {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if !is_file_entry(entry.file_type(), &path) {
                    continue;
                }
                if has_extension(&path, Extensions::SIBLING_JPEG) {
                    sets.jpegs.push(path);
                } else if has_extension(&path, Extensions::SIBLING_RAW) {
                    sets.cr3s.push(path);
                }
            }
            Err(err) => log::warn!("Permission denied or error accessing path: {}", err),
        }
    }
    sets
}

/// CR3 paths whose base name has no JPEG counterpart, sorted.
pub fn find_orphans(jpegs: &[PathBuf], cr3s: &[PathBuf]) -> Vec<PathBuf> {
    let jpeg_names: HashSet<OsString> = jpegs.iter().filter_map(|p| base_name_key(p)).collect();
    let mut orphans: Vec<PathBuf> = cr3s
        .iter()
        .filter(|p| base_name_key(p).is_none_or(|name| !jpeg_names.contains(&name)))
        .cloned()
        .collect();
    orphans.sort();
    orphans
}

/// Scan `root` for orphaned CR3 files. Recomputed from disk on every call.
pub fn scan_for_orphans(root: &Path) -> Result<OrphanScan> {
    if !root.is_dir() {
        bail!("Not a directory: {}", root.display());
    }
    let SiblingSets { jpegs, cr3s } = collect_sibling_sets(root);
    let orphans = find_orphans(&jpegs, &cr3s);
    log::debug!(
        "{}: {} jpg, {} cr3, {} orphaned",
        root.display(),
        jpegs.len(),
        cr3s.len(),
        orphans.len()
    );
    Ok(OrphanScan {
        jpeg_count: jpegs.len(),
        cr3_count: cr3s.len(),
        orphans,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(v: &[&str]) -> Vec<PathBuf> {
        v.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_find_orphans_basic() {
        let jpegs = paths(&["/r/A.jpg"]);
        let cr3s = paths(&["/r/B.cr3", "/r/A.cr3"]);
        assert_eq!(find_orphans(&jpegs, &cr3s), paths(&["/r/B.cr3"]));
    }

    #[test]
    fn test_find_orphans_case_insensitive_across_dirs() {
        let jpegs = paths(&["/r/jpg/img_0001.JPG"]);
        let cr3s = paths(&["/r/raw/IMG_0001.CR3", "/r/raw/IMG_0002.CR3"]);
        assert_eq!(find_orphans(&jpegs, &cr3s), paths(&["/r/raw/IMG_0002.CR3"]));
    }

    #[test]
    fn test_find_orphans_sorted() {
        let cr3s = paths(&["/r/c.cr3", "/r/a.cr3", "/r/b.cr3"]);
        assert_eq!(
            find_orphans(&[], &cr3s),
            paths(&["/r/a.cr3", "/r/b.cr3", "/r/c.cr3"])
        );
    }
}
