//! Application configuration constants.
//! Extension tables, folder names and hashing thresholds in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    settings_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                settings_filename: format!("{pkg}.toml"),
            }
        })
    }

    /// Settings file looked up in the working directory when `--config` is not given.
    pub fn settings_filename(&self) -> &str {
        &self.settings_filename
    }
}

// ---- Extension tables (lowercase, no dot) ----

pub struct Extensions;

impl Extensions {
    pub const JPEG_LIKE: &'static [&'static str] = &["jpg", "jpeg", "png"];
    pub const RAW: &'static [&'static str] = &[
        "raw", // generic
        "nef", // Nikon
        "cr2", // Canon
        "cr3", // Canon
        "arw", // Sony
        "dng", // Adobe / generic
        "raf", // Fujifilm
        "orf", // Olympus
        "pef", // Pentax
        "srw", // Samsung
        "x3f", // Sigma
    ];
    pub const VIDEO: &'static [&'static str] = &["mp4", "avi", "mov"];

    /// Sibling matching only looks at the JPEG + Canon RAW pair.
    pub const SIBLING_JPEG: &'static str = "jpg";
    pub const SIBLING_RAW: &'static str = "cr3";
}

// ---- Destination layout ----

pub struct FolderNames;

impl FolderNames {
    pub const JPG: &'static str = "JPG";
    pub const RAW: &'static str = "RAW";
    /// Separator between the date bucket and the event label.
    pub const EVENT_SEPARATOR: char = '_';
}

/// `strftime` pattern for date buckets (`20240115`).
pub const DATE_BUCKET_FORMAT: &str = "%Y%m%d";
pub const DATE_BUCKET_LEN: usize = 8;

// ---- Hashing ----

/// Hashing I/O thresholds and buffer sizes.
pub struct HashingConsts;

impl HashingConsts {
    /// File size above which hashing uses memory-mapped I/O (bytes). 100 MB.
    pub const HASH_MMAP_THRESHOLD: u64 = 100 * 1024 * 1024;
    /// Chunk size for reading files below mmap threshold (bytes). 1 MB.
    pub const HASH_READ_CHUNK_SIZE: usize = 1024 * 1024;
}

// ---- Progress ----

pub struct ProgressConsts;

impl ProgressConsts {
    pub const DONE: u8 = 100;
    /// Capacity of the ingest event channel; progress is at most one event per file.
    pub const EVENT_CHANNEL_CAP: usize = 1024;
}
