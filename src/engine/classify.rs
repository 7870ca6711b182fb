//! Extension-based media classification.

use std::ffi::OsStr;
use std::path::Path;

use crate::utils::config::Extensions;
use crate::{Classification, MediaCategory, SubCategory};

use super::tools::lowercase_extension;

/// Classify a bare file name. Matching is case-insensitive on the text after the last dot,
/// so names that are not valid UTF-8 classify by their extension like any other.
pub fn classify(filename: impl AsRef<OsStr>) -> Classification {
    let Some(ext) = lowercase_extension(filename) else {
        return Classification::UNCLASSIFIED;
    };
    let ext = ext.as_str();
    if Extensions::JPEG_LIKE.contains(&ext) {
        Classification {
            category: MediaCategory::Image,
            sub_category: SubCategory::JpegLike,
        }
    } else if Extensions::RAW.contains(&ext) {
        Classification {
            category: MediaCategory::Image,
            sub_category: SubCategory::Raw,
        }
    } else if Extensions::VIDEO.contains(&ext) {
        Classification {
            category: MediaCategory::Video,
            sub_category: SubCategory::None,
        }
    } else {
        Classification::UNCLASSIFIED
    }
}

/// Classify by the path's file name.
pub fn classify_path(path: &Path) -> Classification {
    path.file_name()
        .map(classify)
        .unwrap_or(Classification::UNCLASSIFIED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_raw_extension_is_raw_image() {
        for ext in Extensions::RAW {
            let c = classify(&format!("IMG_0001.{ext}"));
            assert_eq!(c.category, MediaCategory::Image, "{ext}");
            assert_eq!(c.sub_category, SubCategory::Raw, "{ext}");
        }
    }

    #[test]
    fn test_no_extension_is_unclassified() {
        assert_eq!(classify("README"), Classification::UNCLASSIFIED);
        assert_eq!(classify("archive."), Classification::UNCLASSIFIED);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_name_classifies_by_extension() {
        use std::os::unix::ffi::OsStrExt;
        let name = OsStr::from_bytes(b"caf\xe9.JPG");
        assert_eq!(classify(name).sub_category, SubCategory::JpegLike);
        let raw = OsStr::from_bytes(b"\xff\xfe.cr3");
        assert_eq!(classify(raw).sub_category, SubCategory::Raw);
    }
}
