//! Date buckets from file modification times.

use chrono::{DateTime, Local};
use std::path::Path;
use std::time::SystemTime;

use crate::error::FileError;
use crate::utils::config::{DATE_BUCKET_FORMAT, DATE_BUCKET_LEN};

/// `YYYYMMDD` of `time` in local time.
pub fn bucket_from_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format(DATE_BUCKET_FORMAT)
        .to_string()
}

/// Date bucket of the file at `path`, from its last-modified timestamp.
pub fn bucket_for(path: &Path) -> Result<String, FileError> {
    let modified = std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|source| FileError::MetadataRead {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(bucket_from_time(modified))
}

/// True if `s` looks like a date bucket (exactly eight ASCII digits).
pub fn is_date_bucket(s: &str) -> bool {
    s.len() == DATE_BUCKET_LEN && s.bytes().all(|b| b.is_ascii_digit())
}
