use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, bounded};
use log::{debug, warn};
use std::path::Path;
use std::thread::{self, JoinHandle};

use crate::engine::allocator::event_folder;
use crate::engine::classify::classify;
use crate::engine::copier::copy_verified;
use crate::engine::dates::bucket_for;
use crate::error::FileError;
use crate::utils::config::ProgressConsts;
use crate::{IngestEvent, IngestJob, IngestReport, MediaCategory, SkipRecord};

use super::context::IngestContext;
use super::error_handler::log_run_summary;
use super::walk::{Discovery, discover_files};

/// Run one ingest synchronously: scan the source, then classify, bucket, place and copy each
/// file in discovery order. `on_progress` gets a percentage after every file and a final 100.
///
/// No file failure aborts the run. A source with no files returns the empty-source report
/// without any progress.
pub fn run_ingest<F>(job: &IngestJob, mut on_progress: F) -> IngestReport
where
    F: FnMut(u8),
{
    debug!("Scanning {}", job.source_root.display());
    let Discovery { files, errors } = discover_files(&job.source_root, false);

    if files.is_empty() {
        let mut report = IngestReport::empty_source();
        report.skipped = errors
            .into_iter()
            .map(|(path, message)| SkipRecord {
                path: path.clone(),
                attempted: None,
                error: FileError::Walk { path, message },
            })
            .collect();
        log_run_summary(&report);
        return report;
    }

    debug!("Found {} files, copying", files.len());
    let mut ctx = IngestContext::new(job, files.len());
    for (path, message) in errors {
        ctx.skip(path.clone(), None, FileError::Walk { path, message });
    }

    for path in &files {
        process_file(&mut ctx, path);
        on_progress(ctx.advance());
    }
    on_progress(ProgressConsts::DONE);

    let report = ctx.into_report();
    log_run_summary(&report);
    report
}

/// Classify → date → filter → allocate → copy for a single file. Every exit is recorded in `ctx`.
fn process_file(ctx: &mut IngestContext<'_>, path: &Path) {
    let job = ctx.job;
    let Some(filename) = path.file_name() else {
        debug!("Skipping entry without a file name: {}", path.display());
        ctx.unclassified += 1;
        return;
    };

    let class = classify(filename);
    let target_root = match class.category {
        MediaCategory::Image => &job.image_target_root,
        MediaCategory::Video => &job.video_target_root,
        MediaCategory::Unclassified => {
            debug!("Not a media file, skipping: {}", path.display());
            ctx.unclassified += 1;
            return;
        }
    };
    debug!("{} identified as {:?}", path.display(), class.category);

    let bucket = match bucket_for(path) {
        Ok(bucket) => bucket,
        Err(e) => {
            warn!("Skipping {}: {}", path.display(), e);
            ctx.skip(path.to_path_buf(), None, e);
            return;
        }
    };
    if !job.accepts_date(&bucket) {
        debug!("Date {} not selected, skipping {}", bucket, path.display());
        ctx.filtered_out += 1;
        return;
    }

    let allocation = match ctx.allocator.allocate(
        target_root,
        &bucket,
        &job.event_label,
        class.sub_category,
        job.separate_raw,
        filename,
    ) {
        Ok(a) => a,
        Err(e) => {
            let attempted = event_folder(target_root, &bucket, &job.event_label);
            warn!(
                "Skipping {} (destination {}): {}",
                path.display(),
                attempted.display(),
                e
            );
            ctx.skip(path.to_path_buf(), Some(attempted), e);
            return;
        }
    };
    ctx.folders.insert(allocation.folder);

    let outcome = copy_verified(path, &allocation.dest, job.verify);
    ctx.outcomes.push(outcome);
}

/// A pipeline running on its own thread. Receive [`IngestEvent`]s from `events`, or call
/// [`IngestHandle::wait`] to drive it to completion.
pub struct IngestHandle {
    pub events: Receiver<IngestEvent>,
    handle: JoinHandle<()>,
}

impl IngestHandle {
    /// Forward progress to `on_progress` until the run finishes, then join the thread.
    pub fn wait<F>(self, mut on_progress: F) -> Result<IngestReport>
    where
        F: FnMut(u8),
    {
        let mut report = None;
        while let Ok(event) = self.events.recv() {
            match event {
                IngestEvent::Progress(pct) => on_progress(pct),
                IngestEvent::Finished(r) => {
                    report = Some(r);
                    break;
                }
            }
        }
        self.handle
            .join()
            .map_err(|_| anyhow::anyhow!("ingest thread panicked"))?;
        report.ok_or_else(|| anyhow::anyhow!("ingest thread ended without a result"))
    }
}

/// Start [`run_ingest`] on a dedicated thread. The job is moved into the thread and owned by it.
pub fn spawn_ingest(job: IngestJob) -> Result<IngestHandle> {
    let (tx, rx) = bounded::<IngestEvent>(ProgressConsts::EVENT_CHANNEL_CAP);
    let handle = thread::Builder::new()
        .name(format!("{}-ingest", env!("CARGO_PKG_NAME")))
        .spawn(move || {
            let progress_tx = tx.clone();
            let report = run_ingest(&job, |pct| {
                let _ = progress_tx.send(IngestEvent::Progress(pct));
            });
            let _ = tx.send(IngestEvent::Finished(report));
        })
        .context("spawn ingest thread")?;
    Ok(IngestHandle { events: rx, handle })
}
