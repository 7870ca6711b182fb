//! Public and internal types for the cardcopy API and pipeline.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use crate::error::FileError;

/// Top-level media category derived from the file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaCategory {
    Image,
    Video,
    Unclassified,
}

/// Image sub-category. Videos and unclassified files are always [`SubCategory::None`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubCategory {
    /// `.jpg`, `.jpeg`, `.png`
    JpegLike,
    /// Camera RAW formats (`.cr3`, `.nef`, `.arw`, ...)
    Raw,
    None,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Classification {
    pub category: MediaCategory,
    pub sub_category: SubCategory,
}

impl Classification {
    pub const UNCLASSIFIED: Classification = Classification {
        category: MediaCategory::Unclassified,
        sub_category: SubCategory::None,
    };

    pub fn is_media(&self) -> bool {
        self.category != MediaCategory::Unclassified
    }
}

/// Everything one ingest run needs. Built once by the caller and owned by the running pipeline.
///
/// `event_label` is used verbatim in folder names; it must not contain path separators.
/// An empty `date_filter` means every date is copied.
#[derive(Clone, Debug)]
pub struct IngestJob {
    pub source_root: PathBuf,
    pub image_target_root: PathBuf,
    pub video_target_root: PathBuf,
    /// Put images under `JPG/` or `RAW/` inside the date/event folder.
    pub separate_raw: bool,
    pub event_label: String,
    pub date_filter: BTreeSet<String>,
    /// Re-read and digest both copies after each copy. When false, copies report
    /// [`CopyStatus::CopiedUnverified`].
    pub verify: bool,
}

impl IngestJob {
    pub fn new(
        source_root: impl Into<PathBuf>,
        image_target_root: impl Into<PathBuf>,
        video_target_root: impl Into<PathBuf>,
        event_label: impl Into<String>,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            image_target_root: image_target_root.into(),
            video_target_root: video_target_root.into(),
            separate_raw: false,
            event_label: event_label.into(),
            date_filter: BTreeSet::new(),
            verify: true,
        }
    }

    pub fn with_separate_raw(mut self, separate_raw: bool) -> Self {
        self.separate_raw = separate_raw;
        self
    }

    pub fn with_dates<I, S>(mut self, dates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.date_filter = dates.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// True when `bucket` passes the date filter.
    pub fn accepts_date(&self, bucket: &str) -> bool {
        self.date_filter.is_empty() || self.date_filter.contains(bucket)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyStatus {
    CopiedVerified,
    CopiedUnverified,
    Failed,
}

/// Result of copying one file.
#[derive(Debug)]
pub struct CopyOutcome {
    pub source_path: PathBuf,
    pub dest_path: PathBuf,
    pub status: CopyStatus,
    pub error: Option<FileError>,
}

impl CopyOutcome {
    pub fn is_copied(&self) -> bool {
        self.status != CopyStatus::Failed
    }
}

/// A file that never reached the copier (stat or mkdir failure, walk error).
#[derive(Debug)]
pub struct SkipRecord {
    pub path: PathBuf,
    /// Destination that was being prepared, when one was known.
    pub attempted: Option<PathBuf>,
    pub error: FileError,
}

/// Terminal state of an ingest run.
#[derive(Debug, PartialEq, Eq)]
pub enum IngestSummary {
    /// The source held no files at all. A warning, not a failure.
    EmptySource,
    /// Run finished. Holds every distinct `{date}_{event}` folder the run placed files into.
    Completed { folders: BTreeSet<PathBuf> },
}

/// Final report of one ingest run.
#[derive(Debug)]
pub struct IngestReport {
    pub summary: IngestSummary,
    /// Files found by the walk (the progress denominator).
    pub total_discovered: usize,
    pub unclassified: usize,
    pub filtered_out: usize,
    pub outcomes: Vec<CopyOutcome>,
    pub skipped: Vec<SkipRecord>,
}

impl IngestReport {
    pub fn empty_source() -> Self {
        Self {
            summary: IngestSummary::EmptySource,
            total_discovered: 0,
            unclassified: 0,
            filtered_out: 0,
            outcomes: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn is_empty_source(&self) -> bool {
        self.summary == IngestSummary::EmptySource
    }

    pub fn copied(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_copied()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_copied()).count()
    }

    /// The single terminal message for the caller: the empty-source warning or the folder summary.
    pub fn message(&self) -> String {
        match &self.summary {
            IngestSummary::EmptySource => EMPTY_SOURCE_MESSAGE.to_string(),
            IngestSummary::Completed { folders } => {
                let joined = folders
                    .iter()
                    .map(|f| f.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Copy finished, folders: {joined}")
            }
        }
    }
}

pub const EMPTY_SOURCE_MESSAGE: &str =
    "No files found in the source directory; check the card path.";

/// Events delivered by [`spawn_ingest`](crate::spawn_ingest): zero or more `Progress`, then exactly one `Finished`.
#[derive(Debug)]
pub enum IngestEvent {
    /// Integer percentage 0..=100.
    Progress(u8),
    Finished(IngestReport),
}

/// Result of scanning a tree for CR3 files without a JPEG sibling.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrphanScan {
    pub jpeg_count: usize,
    pub cr3_count: usize,
    /// Sorted by path.
    pub orphans: Vec<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrphanAction {
    /// Move to the platform's recoverable trash.
    Trash,
    /// Move into a chosen directory, keeping the file name.
    Relocate,
}

impl fmt::Display for OrphanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrphanAction::Trash => write!(f, "trash"),
            OrphanAction::Relocate => write!(f, "relocate"),
        }
    }
}

/// Per-path result of an orphan batch operation.
#[derive(Debug)]
pub struct OperationOutcome {
    pub path: PathBuf,
    /// Where the file went, for successful relocations.
    pub destination: Option<PathBuf>,
    pub error: Option<FileError>,
}

impl OperationOutcome {
    pub fn success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug)]
pub enum BatchReport {
    /// Relocate was requested without a destination; nothing was touched.
    NoDestination,
    Applied(Vec<OperationOutcome>),
}

impl BatchReport {
    pub fn outcomes(&self) -> &[OperationOutcome] {
        match self {
            BatchReport::NoDestination => &[],
            BatchReport::Applied(outcomes) => outcomes,
        }
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes().iter().filter(|o| o.success()).count()
    }
}
