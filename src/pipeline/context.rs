//! Per-run state of an ingest: the allocator, folder set, counters and records.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::engine::allocator::PathAllocator;
use crate::error::FileError;
use crate::utils::config::ProgressConsts;
use crate::{CopyOutcome, IngestJob, IngestReport, IngestSummary, SkipRecord};

/// `round(processed / total * 100)`, clamped to 100. Zero total reports 100.
pub fn percent(processed: usize, total: usize) -> u8 {
    if total == 0 {
        return ProgressConsts::DONE;
    }
    let pct = (processed as f64 / total as f64 * 100.0).round();
    pct.min(ProgressConsts::DONE as f64) as u8
}

/// Mutable state owned by one running pipeline. Built after discovery, consumed into the report.
pub struct IngestContext<'a> {
    pub job: &'a IngestJob,
    pub allocator: PathAllocator,
    pub total: usize,
    pub processed: usize,
    pub folders: BTreeSet<PathBuf>,
    pub unclassified: usize,
    pub filtered_out: usize,
    pub outcomes: Vec<CopyOutcome>,
    pub skipped: Vec<SkipRecord>,
}

impl<'a> IngestContext<'a> {
    pub fn new(job: &'a IngestJob, total: usize) -> Self {
        Self {
            job,
            allocator: PathAllocator::new(),
            total,
            processed: 0,
            folders: BTreeSet::new(),
            unclassified: 0,
            filtered_out: 0,
            outcomes: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Count one more file as processed (copied, skipped or failed) and return the new percentage.
    pub fn advance(&mut self) -> u8 {
        self.processed += 1;
        percent(self.processed, self.total)
    }

    pub fn skip(&mut self, path: PathBuf, attempted: Option<PathBuf>, error: FileError) {
        self.skipped.push(SkipRecord {
            path,
            attempted,
            error,
        });
    }

    pub fn into_report(self) -> IngestReport {
        IngestReport {
            summary: IngestSummary::Completed {
                folders: self.folders,
            },
            total_discovered: self.total,
            unclassified: self.unclassified,
            filtered_out: self.filtered_out,
            outcomes: self.outcomes,
            skipped: self.skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounds() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(3, 3), 100);
        assert_eq!(percent(199, 200), 100);
        assert_eq!(percent(0, 5), 0);
    }

    #[test]
    fn test_percent_zero_total() {
        assert_eq!(percent(0, 0), 100);
    }
}
