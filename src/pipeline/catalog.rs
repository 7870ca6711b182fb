//! Date buckets present on a source, for choosing an ingest date filter.

use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::Path;

use crate::engine::classify::classify_path;
use crate::engine::dates::bucket_for;

use super::walk::discover_files;

/// Distinct date buckets of the image and video files under `source_root`, ascending.
/// Files whose metadata cannot be read are logged and left out.
pub fn list_dates(source_root: &Path) -> BTreeSet<String> {
    let discovery = discover_files(source_root, false);
    discovery
        .files
        .par_iter()
        .filter(|path| classify_path(path).is_media())
        .filter_map(|path| match bucket_for(path) {
            Ok(bucket) => Some(bucket),
            Err(e) => {
                log::error!("{}", e);
                None
            }
        })
        .collect()
}
