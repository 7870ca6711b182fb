//! CLI command handlers: ingest, dates, orphans.

use anyhow::{Result, bail};
use log::debug;
use std::path::{Path, PathBuf};

use crate::engine::arg_parser::{Cli, Commands, IngestArgs, OrphanCommands};
use crate::engine::dates::is_date_bucket;
use crate::engine::progress::{
    ProgressBarConfig, create_progress_bar, finish_bar, percent_callback,
};
use crate::engine::tools::{display_path, is_valid_event_label};
use crate::orphans::{apply_orphan_action, scan_for_orphans};
use crate::pipeline::{list_dates, spawn_ingest};
use crate::utils::{Colors, Settings, load_settings, setup_logging};
use crate::{BatchReport, IngestJob, IngestReport, OrphanAction, OrphanScan};

/// Dispatch the parsed command line.
pub fn handle_run(cli: &Cli) -> Result<()> {
    setup_logging(cli.verbose);
    let settings = load_settings(cli.config.as_deref());
    match &cli.command {
        Commands::Ingest(args) => handle_ingest(args, &settings),
        Commands::Dates { source } => handle_dates(source.as_deref(), &settings),
        Commands::Orphans(cmd) => handle_orphans(cmd),
    }
}

fn resolve_source(source: Option<&Path>, settings: &Settings) -> Result<PathBuf> {
    match source.map(Path::to_path_buf).or_else(|| settings.sd_card.clone()) {
        Some(p) => Ok(p),
        None => bail!("No card directory: pass --source or set sd_card_directory in the settings file"),
    }
}

/// Merge CLI flags over settings into an [`IngestJob`], rejecting labels and dates the
/// folder naming cannot take.
pub fn resolve_job(args: &IngestArgs, settings: &Settings) -> Result<IngestJob> {
    if !is_valid_event_label(&args.event) {
        bail!("Event label must not contain path separators: {:?}", args.event);
    }
    if let Some(bad) = args.dates.iter().find(|d| !is_date_bucket(d)) {
        bail!("Invalid date {:?}: expected YYYYMMDD", bad);
    }
    let source = resolve_source(args.source.as_deref(), settings)?;
    let images = args
        .images
        .clone()
        .unwrap_or_else(|| settings.image_target.clone());
    let videos = args
        .videos
        .clone()
        .unwrap_or_else(|| settings.video_target.clone());
    Ok(IngestJob::new(source, images, videos, args.event.clone())
        .with_separate_raw(args.separate_raw.unwrap_or(settings.separate_raw))
        .with_verify(args.verify.unwrap_or(settings.verify))
        .with_dates(args.dates.iter().cloned()))
}

fn handle_ingest(args: &IngestArgs, settings: &Settings) -> Result<()> {
    let job = resolve_job(args, settings)?;
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        job
    );
    let handle = spawn_ingest(job)?;
    let bar = Some(create_progress_bar(ProgressBarConfig::percent("Copying")));
    let report = handle.wait(percent_callback(&bar))?;
    if let Some(bar) = &bar {
        finish_bar(bar);
    }
    print_ingest_report(&report);
    Ok(())
}

fn print_ingest_report(report: &IngestReport) {
    if report.is_empty_source() {
        println!("{}", Colors::colorize(Colors::SKIPPED, &report.message()));
        return;
    }
    println!("{}", report.message());
    println!(
        "{} | {} | {}",
        Colors::colorize(Colors::COPIED, &format!("Copied: {}", report.copied())),
        Colors::colorize(Colors::FAILED, &format!("Failed: {}", report.failed())),
        Colors::colorize(
            Colors::SKIPPED,
            &format!(
                "Skipped: {}",
                report.skipped.len() + report.unclassified + report.filtered_out
            )
        )
    );
    for o in report.outcomes.iter().filter(|o| !o.is_copied()) {
        if let Some(e) = &o.error {
            println!("  {} {}", Colors::colorize(Colors::FAILED, "failed:"), e);
        }
    }
}

fn handle_dates(source: Option<&Path>, settings: &Settings) -> Result<()> {
    let source = resolve_source(source, settings)?;
    let dates = list_dates(&source);
    if dates.is_empty() {
        println!("No photo or video files found in {}", source.display());
    }
    for d in dates {
        println!("{d}");
    }
    Ok(())
}

fn handle_orphans(cmd: &OrphanCommands) -> Result<()> {
    match cmd {
        OrphanCommands::Scan { dir } => {
            let scan = scan_for_orphans(dir)?;
            print_scan(&scan, dir);
        }
        OrphanCommands::Trash { dir } => run_batch(dir, OrphanAction::Trash, None)?,
        OrphanCommands::Move { dir, to } => run_batch(dir, OrphanAction::Relocate, to.as_deref())?,
    }
    Ok(())
}

/// Scan, apply `action` to the orphans, then rescan and print the refreshed counts.
fn run_batch(dir: &Path, action: OrphanAction, to: Option<&Path>) -> Result<()> {
    let scan = scan_for_orphans(dir)?;
    if scan.orphans.is_empty() {
        print_scan(&scan, dir);
        return Ok(());
    }
    let report = apply_orphan_action(action, &scan.orphans, to);
    let BatchReport::Applied(outcomes) = &report else {
        bail!("No destination selected: pass --to DEST");
    };
    for o in outcomes {
        match (&o.error, &o.destination) {
            (None, Some(dest)) => println!(
                "  {} {} -> {}",
                Colors::colorize(Colors::COPIED, "moved"),
                display_path(&o.path, dir),
                dest.display()
            ),
            (None, None) => println!(
                "  {} {}",
                Colors::colorize(Colors::COPIED, "trashed"),
                display_path(&o.path, dir)
            ),
            (Some(e), _) => println!("  {} {}", Colors::colorize(Colors::FAILED, "failed:"), e),
        }
    }
    println!(
        "{}: {}/{} succeeded",
        action,
        report.succeeded(),
        outcomes.len()
    );
    let refreshed = scan_for_orphans(dir)?;
    print_scan(&refreshed, dir);
    Ok(())
}

fn print_scan(scan: &OrphanScan, dir: &Path) {
    println!("JPG files: {}", scan.jpeg_count);
    println!("CR3 files: {}", scan.cr3_count);
    println!(
        "CR3 files without a matching JPG: {}",
        Colors::colorize(Colors::SKIPPED, &scan.orphans.len().to_string())
    );
    for p in &scan.orphans {
        println!(
            "  {}",
            Colors::colorize(Colors::PATH, &display_path(p, dir))
        );
    }
}
