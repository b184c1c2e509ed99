//! Path utilities for recognising source images and naming thumbnails.
//!
//! Thumbnails live in a `thumbnails` directory next to their source image
//! and are named after the portion of the file name before its first dot.

use std::path::{Path, PathBuf};

/// List of supported source image extensions.
const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff",
];

/// Name of the directory thumbnails are written to, relative to the source directory.
pub const THUMBNAIL_DIR: &str = "thumbnails";

/// Suffix appended to the source stem to form a thumbnail name.
pub const THUMBNAIL_SUFFIX: &str = "-thumb";

/// Extension of generated thumbnails.
pub const THUMBNAIL_EXTENSION: &str = "avif";

/// Check if a path has a source image file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use gallery_common::paths::is_image_file;
///
/// assert!(is_image_file(Path::new("DSC_0001.jpg")));
/// assert!(is_image_file(Path::new("/scans/roll-04/frame.TIFF")));
/// assert!(!is_image_file(Path::new("notes.txt")));
/// ```
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Check if a path names a hidden (dot-prefixed) file.
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Directory that holds thumbnails for images in `source_dir`.
pub fn thumbnail_dir(source_dir: &Path) -> PathBuf {
    source_dir.join(THUMBNAIL_DIR)
}

/// File name of the thumbnail generated for `source`.
///
/// The stem is everything before the first `.` of the file name, so
/// `roll.04.frame.jpg` becomes `roll-thumb.avif`.
///
/// Returns `None` when the path has no file name or an empty stem.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use gallery_common::paths::thumbnail_file_name;
///
/// assert_eq!(
///     thumbnail_file_name(Path::new("/photos/IMG_0042.jpg")).as_deref(),
///     Some("IMG_0042-thumb.avif"),
/// );
/// ```
pub fn thumbnail_file_name(source: &Path) -> Option<String> {
    let name = source.file_name()?.to_str()?;
    let stem = name.split('.').next().filter(|s| !s.is_empty())?;
    Some(format!(
        "{}{}.{}",
        stem, THUMBNAIL_SUFFIX, THUMBNAIL_EXTENSION
    ))
}

/// Full thumbnail path for `source`, inside [`thumbnail_dir`] of its parent.
pub fn thumbnail_path_for(source: &Path) -> Option<PathBuf> {
    let parent = source.parent().unwrap_or_else(|| Path::new(""));
    let name = thumbnail_file_name(source)?;
    Some(thumbnail_dir(parent).join(name))
}
