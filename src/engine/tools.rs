//! Path and name utilities

use std::ffi::{OsStr, OsString};
use std::fs::FileType;
use std::path::{Path, PathBuf};

/// Lowercased final extension of `name`, or None when there is none or it is empty.
/// Names that are not valid UTF-8 still yield their extension.
pub fn lowercase_extension(name: impl AsRef<OsStr>) -> Option<String> {
    let ext = Path::new(name.as_ref()).extension()?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_string_lossy().to_lowercase())
}

/// True if `path`'s file name ends with `.{ext}` (ext given lowercase, no dot).
pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.file_name()
        .and_then(lowercase_extension)
        .is_some_and(|e| e == ext)
}

/// Lowercased file name with its final extension stripped, used for sibling matching.
/// Stems that are not valid UTF-8 are lowercased in their ASCII range only.
pub fn base_name_key(path: &Path) -> Option<OsString> {
    let stem = path.file_stem()?;
    Some(match stem.to_str() {
        Some(s) => OsString::from(s.to_lowercase()),
        None => stem.to_ascii_lowercase(),
    })
}

/// `name` with `_{counter}` inserted before the extension (`IMG_1.JPG`, `README_2`).
pub fn suffixed_name(name: impl AsRef<OsStr>, counter: u64) -> OsString {
    let path = Path::new(name.as_ref());
    let mut out = path.file_stem().map(OsStr::to_os_string).unwrap_or_default();
    out.push(format!("_{counter}"));
    if let Some(ext) = path.extension() {
        out.push(".");
        out.push(ext);
    }
    out
}

/// A walk entry that is a regular file, or a symlink that resolves to one.
pub fn is_file_entry(file_type: FileType, path: &Path) -> bool {
    file_type.is_file() || (file_type.is_symlink() && path.is_file())
}

/// Convert absolute path to relative path from base
pub fn path_relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(|p| p.to_path_buf())
}

/// Path shown to the user: relative to `base` when under it, else as given.
pub fn display_path(path: &Path, base: &Path) -> String {
    path_relative_to(path, base)
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

/// True when `label` can be used verbatim as part of a single folder name.
pub fn is_valid_event_label(label: &str) -> bool {
    !label.contains(['/', '\\']) && label != "." && label != ".."
}
