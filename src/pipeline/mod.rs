//! Ingest pipeline: discovery walk, per-run context, orchestration and run summary.

pub mod catalog;
pub mod context;
pub mod error_handler;
pub mod orchestrator;
pub mod walk;

pub use catalog::list_dates;
pub use context::{IngestContext, percent};
pub use error_handler::log_run_summary;
pub use orchestrator::{IngestHandle, run_ingest, spawn_ingest};
pub use walk::{Discovery, WalkOutcome, discover_files, run_walk_loop, to_outcome_walkdir};
