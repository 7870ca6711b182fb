//! Destination folder layout and collision-safe file placement.
//!
//! Layout: `{target_root}/{YYYYMMDD}_{event}[/JPG|/RAW]/{name or name_N}`.
//!
//! A destination is claimed by creating it with `create_new`, so two writers can never be
//! handed the same path. The copier then fills the reserved file.

use log::{debug, info};
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

use crate::SubCategory;
use crate::error::FileError;
use crate::utils::config::FolderNames;

use super::tools::suffixed_name;

/// Where one file will go.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Allocation {
    /// The `{date}_{event}` folder (without any JPG/RAW subfolder).
    pub folder: PathBuf,
    /// Reserved destination file. Exists (empty) on return.
    pub dest: PathBuf,
}

/// `{target_root}/{date_bucket}_{event_label}`
pub fn event_folder(target_root: &Path, date_bucket: &str, event_label: &str) -> PathBuf {
    target_root.join(format!(
        "{}{}{}",
        date_bucket,
        FolderNames::EVENT_SEPARATOR,
        event_label
    ))
}

/// Directory a file lands in inside its event folder.
pub fn target_dir(folder: &Path, sub_category: SubCategory, separate_raw: bool) -> PathBuf {
    if !separate_raw {
        return folder.to_path_buf();
    }
    match sub_category {
        SubCategory::JpegLike => folder.join(FolderNames::JPG),
        SubCategory::Raw => folder.join(FolderNames::RAW),
        SubCategory::None => folder.to_path_buf(),
    }
}

/// Claim a free name for `filename` in `dir`: the name itself, then `name_1.ext`, `name_2.ext`, ...
/// The returned path has been created empty.
pub fn reserve_unique(dir: &Path, filename: impl AsRef<OsStr>) -> Result<PathBuf, FileError> {
    let filename = filename.as_ref();
    let mut candidate = dir.join(filename);
    let mut counter: u64 = 0;
    loop {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(_) => {
                if counter > 0 {
                    debug!(
                        "{} taken, using {}",
                        filename.to_string_lossy(),
                        candidate.display()
                    );
                }
                return Ok(candidate);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                counter += 1;
                candidate = dir.join(suffixed_name(filename, counter));
            }
            Err(source) => {
                return Err(FileError::Reserve {
                    path: candidate,
                    source,
                });
            }
        }
    }
}

/// Allocates destinations for one run. Remembers directories it has already ensured so each
/// is created at most once per run.
#[derive(Debug, Default)]
pub struct PathAllocator {
    ensured: HashSet<PathBuf>,
}

impl PathAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the destination for `filename`, creating missing directories, and reserve a
    /// collision-free name in it.
    pub fn allocate(
        &mut self,
        target_root: &Path,
        date_bucket: &str,
        event_label: &str,
        sub_category: SubCategory,
        separate_raw: bool,
        filename: &OsStr,
    ) -> Result<Allocation, FileError> {
        let folder = event_folder(target_root, date_bucket, event_label);
        let dir = target_dir(&folder, sub_category, separate_raw);
        self.ensure_dir(&dir)?;
        let dest = reserve_unique(&dir, filename)?;
        Ok(Allocation { folder, dest })
    }

    /// Create-if-absent, once per run.
    fn ensure_dir(&mut self, dir: &Path) -> Result<(), FileError> {
        if self.ensured.contains(dir) {
            return Ok(());
        }
        if !dir.is_dir() {
            std::fs::create_dir_all(dir).map_err(|source| FileError::DirectoryCreate {
                path: dir.to_path_buf(),
                source,
            })?;
            info!("Created folder: {}", dir.display());
        }
        self.ensured.insert(dir.to_path_buf());
        Ok(())
    }

    /// Directories ensured so far in this run.
    pub fn ensured_dirs(&self) -> usize {
        self.ensured.len()
    }
}
