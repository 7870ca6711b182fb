//! Load `cardcopy.toml` (CLI only). The library never reads it; callers pass an
//! [`IngestJob`](crate::IngestJob) built from the resolved [`Settings`].

use directories::UserDirs;
use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};

use crate::utils::config::PackagePaths;

/// Resolved defaults for the CLI: file values over built-in fallbacks, CLI flags applied later.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub image_target: PathBuf,
    pub video_target: PathBuf,
    /// Card root. No built-in default; must come from the file or `--source`.
    pub sd_card: Option<PathBuf>,
    pub separate_raw: bool,
    pub verify: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let desktop = default_desktop_dir();
        Self {
            image_target: desktop.clone(),
            video_target: desktop,
            sd_card: None,
            separate_raw: true,
            verify: true,
        }
    }
}

/// User's desktop folder, else `~/Desktop`, else the working directory.
pub fn default_desktop_dir() -> PathBuf {
    UserDirs::new()
        .and_then(|dirs| {
            dirs.desktop_dir()
                .map(Path::to_path_buf)
                .or_else(|| Some(dirs.home_dir().join("Desktop")))
        })
        .unwrap_or_else(|| PathBuf::from("."))
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SettingsFile {
    #[serde(default)]
    paths: PathsSection,
    #[serde(default)]
    ingest: IngestSection,
}

#[derive(Debug, Default, Deserialize)]
struct PathsSection {
    image_target_directory: Option<String>,
    video_target_directory: Option<String>,
    sd_card_directory: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct IngestSection {
    separate_raw: Option<bool>,
    verify: Option<bool>,
}

/// Parse settings text. Malformed input is logged and treated as absent.
pub(crate) fn parse_settings(text: &str, origin: &Path) -> Option<SettingsFile> {
    toml::from_str(text)
        .map_err(|e| log::warn!("{}: {}", origin.display(), e))
        .ok()
}

/// Read a settings file. A missing default file is Ok(None); a file named explicitly must exist.
pub(crate) fn read_settings_text(path: &Path, explicit: bool) -> io::Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if !explicit && e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Load settings from `path`, or from `cardcopy.toml` in the working directory.
/// Returns None if the file is missing, unreadable or malformed; the last two are logged,
/// as is a missing file that was named explicitly.
pub(crate) fn load_settings_file(path: Option<&Path>) -> Option<SettingsFile> {
    let explicit = path.is_some();
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(PackagePaths::get().settings_filename()));
    let text = match read_settings_text(&path, explicit) {
        Ok(Some(text)) => text,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Cannot read settings {}: {}; using defaults", path.display(), e);
            return None;
        }
    };
    log::debug!("Loaded settings from {}", path.display());
    parse_settings(&text, &path)
}

/// Overwrite settings field from file when present.
macro_rules! apply_file_opt {
    ($section:expr, $settings:expr, $field:ident => $target:ident) => {
        if let Some(v) = $section.$field {
            $settings.$target = v;
        }
    };
}

/// Apply file values to settings (only fields present in the file). Call before applying CLI flags.
pub(crate) fn apply_file_to_settings(file: &SettingsFile, settings: &mut Settings) {
    let paths = &file.paths;
    if let Some(ref p) = paths.image_target_directory {
        settings.image_target = PathBuf::from(p);
    }
    if let Some(ref p) = paths.video_target_directory {
        settings.video_target = PathBuf::from(p);
    }
    if let Some(ref p) = paths.sd_card_directory {
        settings.sd_card = Some(PathBuf::from(p));
    }
    let ingest = &file.ingest;
    apply_file_opt!(ingest, settings, separate_raw => separate_raw);
    apply_file_opt!(ingest, settings, verify => verify);
}

/// Defaults, then the settings file when one is found.
pub fn load_settings(path: Option<&Path>) -> Settings {
    let mut settings = Settings::default();
    if let Some(file) = load_settings_file(path) {
        apply_file_to_settings(&file, &mut settings);
    }
    settings
}
