//! Orphaned RAW detection and the batch actions applied to the result.

pub mod batch;
pub mod reconcile;

pub use batch::apply_orphan_action;
pub use reconcile::{SiblingSets, collect_sibling_sets, find_orphans, scan_for_orphans};
