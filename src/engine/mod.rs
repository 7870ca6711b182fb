//! Engine module: leaf components of the ingest and orphan workflows, plus the CLI surface.

pub mod allocator;
pub mod arg_parser;
pub mod classify;
pub mod cli;
pub mod copier;
pub mod dates;
pub mod hashing;
pub mod progress;
pub mod tools;

// Re-export commonly used functions
pub use allocator::{Allocation, PathAllocator, event_folder, reserve_unique, target_dir};
pub use arg_parser::{Cli, Commands, IngestArgs, OrphanCommands};
pub use classify::{classify, classify_path};
pub use cli::{handle_run, resolve_job};
pub use copier::{copy_verified, verify_copy};
pub use dates::{bucket_for, bucket_from_time, is_date_bucket};
pub use hashing::{FileDigest, digest_hex, hash_file};
pub use tools::{
    base_name_key, display_path, has_extension, is_file_entry, is_valid_event_label,
    lowercase_extension, path_relative_to, suffixed_name,
};
