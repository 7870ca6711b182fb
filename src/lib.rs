//! cardcopy: ingest a memory card into `{date}_{event}` folders with verified copies,
//! and find CR3 files that lost their JPG sibling.

pub mod engine;
pub mod error;
pub mod orphans;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use error::FileError;
pub use types::*;

pub use orphans::{apply_orphan_action, scan_for_orphans};
pub use pipeline::{IngestHandle, list_dates, run_ingest, spawn_ingest};

/// Result alias used by public cardcopy API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;
