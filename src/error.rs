//! Per-file failure causes.
//!
//! None of these abort a run. They are carried inside [`CopyOutcome`](crate::CopyOutcome),
//! [`SkipRecord`](crate::SkipRecord) and [`OperationOutcome`](crate::OperationOutcome) so the
//! caller can report them, and every one is logged where it happens.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileError {
    /// The file could not be stat'ed (permissions, vanished between walk and read).
    #[error("cannot read metadata of {path}: {source}")]
    MetadataRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A destination folder or subfolder could not be created.
    #[error("cannot create directory {path}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A free destination name was found but could not be claimed.
    #[error("cannot reserve destination {path}: {source}")]
    Reserve {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// I/O failure while copying bytes or reading them back for verification.
    #[error("copy {from} -> {to} failed: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Source and destination digests differ after the copy. The destination is left in place.
    #[error("digest mismatch {from} ({source_digest}) -> {to} ({dest_digest})")]
    VerificationMismatch {
        from: PathBuf,
        to: PathBuf,
        source_digest: String,
        dest_digest: String,
    },

    /// The walk reported an entry it could not read.
    #[error("walk error at {path}: {message}")]
    Walk { path: PathBuf, message: String },

    /// The path was listed by a scan but no longer exists.
    #[error("{path} no longer exists")]
    Vanished { path: PathBuf },

    /// A relocation target already holds a file of the same name.
    #[error("destination {path} already exists")]
    DestinationExists { path: PathBuf },

    /// The platform trash refused the file.
    #[error("cannot move {path} to trash: {message}")]
    Trash { path: PathBuf, message: String },

    /// Rename (or copy + remove across devices) failed during relocation.
    #[error("move {from} -> {to} failed: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FileError {
    /// Short, stable name of the failure kind, used in summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            FileError::MetadataRead { .. } => "metadata",
            FileError::DirectoryCreate { .. } => "mkdir",
            FileError::Reserve { .. } => "reserve",
            FileError::Copy { .. } => "copy",
            FileError::VerificationMismatch { .. } => "mismatch",
            FileError::Walk { .. } => "walk",
            FileError::Vanished { .. } => "vanished",
            FileError::DestinationExists { .. } => "exists",
            FileError::Trash { .. } => "trash",
            FileError::Move { .. } => "move",
        }
    }
}
