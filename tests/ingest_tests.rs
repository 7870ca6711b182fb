//! End-to-end ingest runs against temp directories with pinned mtimes.

use cardcopy::engine::arg_parser::IngestArgs;
use cardcopy::engine::{bucket_from_time, resolve_job};
use cardcopy::utils::Settings;
use cardcopy::{
    CopyStatus, EMPTY_SOURCE_MESSAGE, IngestJob, IngestReport, IngestSummary, list_dates,
    run_ingest, spawn_ingest,
};
use chrono::{Local, TimeZone};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::TempDir;

fn local_noon(y: i32, m: u32, d: u32) -> SystemTime {
    SystemTime::from(Local.with_ymd_and_hms(y, m, d, 12, 0, 0).single().unwrap())
}

fn write_at(path: &Path, bytes: &[u8], when: SystemTime) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, bytes).unwrap();
    fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(when)
        .unwrap();
}

struct Fixture {
    _tmp: TempDir,
    card: PathBuf,
    images: PathBuf,
    videos: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let card = tmp.path().join("card");
        let images = tmp.path().join("images");
        let videos = tmp.path().join("videos");
        fs::create_dir_all(&card).unwrap();
        Self {
            _tmp: tmp,
            card,
            images,
            videos,
        }
    }

    fn job(&self, event: &str) -> IngestJob {
        IngestJob::new(&self.card, &self.images, &self.videos, event)
    }
}

fn run(job: &IngestJob) -> (IngestReport, Vec<u8>) {
    let mut progress = Vec::new();
    let report = run_ingest(job, |p| progress.push(p));
    (report, progress)
}

fn folders(report: &IngestReport) -> BTreeSet<PathBuf> {
    match &report.summary {
        IngestSummary::Completed { folders } => folders.clone(),
        IngestSummary::EmptySource => panic!("expected a completed run"),
    }
}

#[test]
fn test_second_run_renames_instead_of_overwriting() {
    let fx = Fixture::new();
    let when = local_noon(2024, 1, 15);
    write_at(&fx.card.join("DCIM/IMG_0001.JPG"), b"first frame", when);
    let job = fx.job("Wedding");

    let (first, _) = run(&job);
    let (second, _) = run(&job);
    assert_eq!(first.copied(), 1);
    assert_eq!(second.copied(), 1);

    let folder = fx.images.join("20240115_Wedding");
    let original = folder.join("IMG_0001.JPG");
    let renamed = folder.join("IMG_0001_1.JPG");
    assert_eq!(fs::read(&original).unwrap(), b"first frame");
    assert_eq!(fs::read(&renamed).unwrap(), b"first frame");
    assert_eq!(second.outcomes[0].dest_path, renamed);
    assert_eq!(second.outcomes[0].status, CopyStatus::CopiedVerified);
}

#[test]
fn test_date_filter_only_creates_selected_folder() {
    let fx = Fixture::new();
    write_at(&fx.card.join("a.jpg"), b"a", local_noon(2024, 1, 1));
    write_at(&fx.card.join("b.jpg"), b"b", local_noon(2024, 1, 2));
    write_at(&fx.card.join("c.mov"), b"c", local_noon(2024, 1, 2));

    let (report, progress) = run(&fx.job("Trip").with_dates(["20240101"]));

    assert!(fx.images.join("20240101_Trip/a.jpg").is_file());
    assert!(!fx.images.join("20240102_Trip").exists());
    assert!(!fx.videos.join("20240102_Trip").exists());
    assert_eq!(report.filtered_out, 2);
    assert_eq!(report.copied(), 1);
    assert_eq!(folders(&report), BTreeSet::from([fx.images.join("20240101_Trip")]));
    // Filtered files still advance progress.
    assert_eq!(progress, vec![33, 67, 100, 100]);
}

#[test]
fn test_progress_is_monotonic_and_ends_at_100() {
    let fx = Fixture::new();
    let when = local_noon(2024, 3, 3);
    for i in 0..7 {
        write_at(&fx.card.join(format!("IMG_{i:04}.JPG")), b"x", when);
    }
    write_at(&fx.card.join("notes.txt"), b"not media", when);

    let (report, progress) = run(&fx.job("e"));

    assert_eq!(report.total_discovered, 8);
    assert_eq!(report.unclassified, 1);
    assert_eq!(progress.len(), 9);
    assert!(progress.windows(2).all(|w| w[0] <= w[1]), "{progress:?}");
    assert_eq!(progress.last(), Some(&100));
}

#[test]
fn test_empty_source_reports_warning_and_touches_nothing() {
    let fx = Fixture::new();
    fs::create_dir_all(fx.card.join("DCIM/100CANON")).unwrap();

    let (report, progress) = run(&fx.job("e"));

    assert!(report.is_empty_source());
    assert_eq!(report.message(), EMPTY_SOURCE_MESSAGE);
    assert!(progress.is_empty());
    assert!(!fx.images.exists());
    assert!(!fx.videos.exists());
}

#[test]
fn test_missing_source_is_empty_source() {
    let fx = Fixture::new();
    let job = IngestJob::new(fx.card.join("nope"), &fx.images, &fx.videos, "e");
    let (report, progress) = run(&job);
    assert!(report.is_empty_source());
    assert!(progress.is_empty());
    assert_eq!(report.skipped.len(), 1);
}

#[test]
fn test_file_as_source_is_empty_source() {
    let fx = Fixture::new();
    let file = fx.card.join("IMG_0001.JPG");
    write_at(&file, b"x", local_noon(2024, 1, 1));
    let job = IngestJob::new(&file, &fx.images, &fx.videos, "e");

    let (report, progress) = run(&job);
    assert!(report.is_empty_source());
    assert!(progress.is_empty());
    assert_eq!(report.skipped[0].error.kind(), "walk");
    assert!(!fx.images.exists());
}

#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_names_are_copied() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let fx = Fixture::new();
    let name = OsStr::from_bytes(b"caf\xe9.JPG");
    write_at(&fx.card.join(name), b"bytes", local_noon(2024, 4, 4));

    let job = fx.job("e");
    let (first, _) = run(&job);
    let (second, _) = run(&job);
    assert_eq!(first.copied(), 1);
    assert_eq!(first.unclassified, 0);
    let folder = fx.images.join("20240404_e");
    assert_eq!(fs::read(folder.join(name)).unwrap(), b"bytes");
    assert_eq!(
        second.outcomes[0].dest_path,
        folder.join(OsStr::from_bytes(b"caf\xe9_1.JPG"))
    );
}

#[cfg(unix)]
#[test]
fn test_symlinked_media_is_copied_as_file() {
    let fx = Fixture::new();
    let real = fx.card.parent().unwrap().join("real.jpg");
    write_at(&real, b"linked", local_noon(2024, 8, 8));
    std::os::unix::fs::symlink("../real.jpg", fx.card.join("link.jpg")).unwrap();

    let (report, _) = run(&fx.job("e"));
    assert!(!report.is_empty_source());
    assert_eq!(report.copied(), 1);
    let dest = fx.images.join("20240808_e/link.jpg");
    assert!(!fs::symlink_metadata(&dest).unwrap().file_type().is_symlink());
    assert_eq!(fs::read(&dest).unwrap(), b"linked");
}

#[test]
fn test_separate_raw_layout() {
    let fx = Fixture::new();
    let when = local_noon(2024, 6, 1);
    write_at(&fx.card.join("IMG_0001.JPG"), b"jpg", when);
    write_at(&fx.card.join("IMG_0001.CR3"), b"raw", when);
    write_at(&fx.card.join("shot.png"), b"png", when);
    write_at(&fx.card.join("MVI_0002.MP4"), b"mp4", when);

    let (report, _) = run(&fx.job("Hike").with_separate_raw(true));

    let img = fx.images.join("20240601_Hike");
    assert!(img.join("JPG/IMG_0001.JPG").is_file());
    assert!(img.join("JPG/shot.png").is_file());
    assert!(img.join("RAW/IMG_0001.CR3").is_file());
    assert!(fx.videos.join("20240601_Hike/MVI_0002.MP4").is_file());
    assert_eq!(
        folders(&report),
        BTreeSet::from([img, fx.videos.join("20240601_Hike")])
    );
    assert!(report.message().contains("20240601_Hike"));
}

#[test]
fn test_without_separate_raw_everything_in_event_folder() {
    let fx = Fixture::new();
    let when = local_noon(2024, 6, 1);
    write_at(&fx.card.join("IMG_0001.JPG"), b"jpg", when);
    write_at(&fx.card.join("IMG_0001.CR3"), b"raw", when);

    run(&fx.job("Hike"));

    let img = fx.images.join("20240601_Hike");
    assert!(img.join("IMG_0001.JPG").is_file());
    assert!(img.join("IMG_0001.CR3").is_file());
    assert!(!img.join("JPG").exists());
}

#[test]
fn test_same_name_in_two_card_folders_is_renamed() {
    let fx = Fixture::new();
    let when = local_noon(2024, 2, 2);
    write_at(&fx.card.join("100CANON/IMG_0001.JPG"), b"one", when);
    write_at(&fx.card.join("101CANON/IMG_0001.JPG"), b"two", when);

    let (report, _) = run(&fx.job("e"));

    let folder = fx.images.join("20240202_e");
    assert_eq!(report.copied(), 2);
    assert_eq!(fs::read(folder.join("IMG_0001.JPG")).unwrap(), b"one");
    assert_eq!(fs::read(folder.join("IMG_0001_1.JPG")).unwrap(), b"two");
}

#[test]
fn test_copy_keeps_mtime_so_dates_survive() {
    let fx = Fixture::new();
    let when = local_noon(2023, 12, 31);
    write_at(&fx.card.join("a.jpg"), b"a", when);

    run(&fx.job("nye"));

    let copied = fx.images.join("20231231_nye/a.jpg");
    let mtime = fs::metadata(&copied).unwrap().modified().unwrap();
    assert_eq!(bucket_from_time(mtime), "20231231");
}

#[test]
fn test_unverified_mode() {
    let fx = Fixture::new();
    write_at(&fx.card.join("a.jpg"), b"a", local_noon(2024, 1, 1));
    let (report, _) = run(&fx.job("e").with_verify(false));
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].status, CopyStatus::CopiedUnverified);
}

#[test]
fn test_unwritable_target_is_skipped_not_fatal() {
    let fx = Fixture::new();
    let when = local_noon(2024, 1, 1);
    write_at(&fx.card.join("a.jpg"), b"a", when);
    write_at(&fx.card.join("b.mov"), b"b", when);
    // A regular file where the image root should be: mkdir fails for images only.
    fs::write(&fx.images, b"blocker").unwrap();

    let (report, progress) = run(&fx.job("e"));

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].error.kind(), "mkdir");
    assert_eq!(
        report.skipped[0].attempted,
        Some(fx.images.join("20240101_e"))
    );
    assert!(fx.videos.join("20240101_e/b.mov").is_file());
    assert_eq!(progress.last(), Some(&100));
}

#[test]
fn test_spawned_run_streams_progress_then_result() {
    let fx = Fixture::new();
    let when = local_noon(2024, 5, 5);
    write_at(&fx.card.join("a.jpg"), b"a", when);
    write_at(&fx.card.join("b.jpg"), b"b", when);

    let handle = spawn_ingest(fx.job("bg")).unwrap();
    let mut progress = Vec::new();
    let report = handle.wait(|p| progress.push(p)).unwrap();

    assert_eq!(progress, vec![50, 100, 100]);
    assert_eq!(report.copied(), 2);
    assert!(fx.images.join("20240505_bg/b.jpg").is_file());
}

#[test]
fn test_spawned_empty_run_has_no_progress() {
    let fx = Fixture::new();
    let handle = spawn_ingest(fx.job("bg")).unwrap();
    let mut progress = Vec::new();
    let report = handle.wait(|p| progress.push(p)).unwrap();
    assert!(progress.is_empty());
    assert!(report.is_empty_source());
}

#[test]
fn test_list_dates_only_counts_media() {
    let fx = Fixture::new();
    write_at(&fx.card.join("a.jpg"), b"a", local_noon(2024, 1, 2));
    write_at(&fx.card.join("sub/b.mp4"), b"b", local_noon(2024, 1, 1));
    write_at(&fx.card.join("sub/c.cr3"), b"c", local_noon(2024, 1, 2));
    write_at(&fx.card.join("readme.txt"), b"t", local_noon(2020, 1, 1));

    let dates: Vec<String> = list_dates(&fx.card).into_iter().collect();
    assert_eq!(dates, vec!["20240101", "20240102"]);
}

// --- CLI job resolution ---

fn args(event: &str) -> IngestArgs {
    IngestArgs {
        event: event.to_string(),
        source: None,
        images: None,
        videos: None,
        dates: Vec::new(),
        separate_raw: None,
        verify: None,
    }
}

fn settings() -> Settings {
    Settings {
        image_target: PathBuf::from("/cfg/images"),
        video_target: PathBuf::from("/cfg/videos"),
        sd_card: Some(PathBuf::from("/cfg/card")),
        separate_raw: true,
        verify: true,
    }
}

#[test]
fn test_resolve_job_uses_settings_then_flags() {
    let job = resolve_job(&args("Wedding"), &settings()).unwrap();
    assert_eq!(job.source_root, PathBuf::from("/cfg/card"));
    assert_eq!(job.image_target_root, PathBuf::from("/cfg/images"));
    assert!(job.separate_raw);
    assert!(job.date_filter.is_empty());

    let mut a = args("Wedding");
    a.source = Some(PathBuf::from("/flag/card"));
    a.videos = Some(PathBuf::from("/flag/videos"));
    a.separate_raw = Some(false);
    a.dates = vec!["20240115".to_string()];
    let job = resolve_job(&a, &settings()).unwrap();
    assert_eq!(job.source_root, PathBuf::from("/flag/card"));
    assert_eq!(job.video_target_root, PathBuf::from("/flag/videos"));
    assert_eq!(job.image_target_root, PathBuf::from("/cfg/images"));
    assert!(!job.separate_raw);
    assert!(job.accepts_date("20240115"));
    assert!(!job.accepts_date("20240116"));
}

#[test]
fn test_resolve_job_rejects_bad_input() {
    assert!(resolve_job(&args("a/b"), &settings()).is_err());

    let mut a = args("ok");
    a.dates = vec!["2024-01-15".to_string()];
    assert!(resolve_job(&a, &settings()).is_err());

    let mut s = settings();
    s.sd_card = None;
    assert!(resolve_job(&args("ok"), &s).is_err());
}
