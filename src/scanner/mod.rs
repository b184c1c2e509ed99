//! Source discovery.
//!
//! Resolves the `process` source argument into `(source, thumbnail)` pairs.
//! A directory contributes the image files directly inside it; the
//! `thumbnails` subdirectory and hidden files are never picked up.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gallery_common::paths::{is_hidden, is_image_file};
use gallery_common::{Error, PhotoPaths};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Collect the photo pairs for `source`, a directory or a single file.
///
/// Directory entries are returned sorted by file name so repeated runs
/// plan identical statements. When two sources map to the same thumbnail
/// the first by name wins and the rest are skipped.
pub fn collect_photo_paths(source: &Path) -> Result<Vec<PhotoPaths>> {
    info!("Scanning path: {}", source.display());

    if !source.exists() {
        return Err(Error::not_found(source.display().to_string()))
            .context("Source path does not exist");
    }

    if source.is_file() {
        info!("Path provided is a FILE");
        let pair = PhotoPaths::for_source(source)?;
        return Ok(vec![pair]);
    }

    info!("Path provided is a DIRECTORY");
    let mut pairs = Vec::new();
    let mut thumbnails: HashSet<PathBuf> = HashSet::new();

    for entry in WalkDir::new(source)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        let path = entry.path();

        if !entry.file_type().is_file() || is_hidden(path) {
            continue;
        }

        if !is_image_file(path) {
            debug!("Skipping non-image file: {}", path.display());
            continue;
        }

        let pair = match PhotoPaths::for_source(path) {
            Ok(pair) => pair,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };

        // Sources sharing a stem would overwrite one thumbnail
        if !thumbnails.insert(pair.thumbnail.clone()) {
            warn!(
                "Skipping {}: thumbnail {} already belongs to another source",
                path.display(),
                pair.thumbnail.display()
            );
            continue;
        }
        pairs.push(pair);
    }

    info!("Found {} files", pairs.len());
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_directory_scan_sorted_images_only() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.jpg"));
        touch(&dir.path().join("a.PNG"));
        touch(&dir.path().join("notes.txt"));
        touch(&dir.path().join(".hidden.jpg"));
        touch(&dir.path().join("thumbnails/a-thumb.avif"));
        touch(&dir.path().join("nested/c.jpg"));

        let pairs = collect_photo_paths(dir.path()).unwrap();
        let names: Vec<&str> = pairs.iter().filter_map(|p| p.source_name()).collect();
        assert_eq!(names, vec!["a.PNG", "b.jpg"]);
        assert_eq!(
            pairs[1].thumbnail,
            dir.path().join("thumbnails").join("b-thumb.avif")
        );
    }

    #[test]
    fn test_shared_thumbnail_keeps_first_source() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.jpg"));
        touch(&dir.path().join("a.png"));
        touch(&dir.path().join("roll.01.jpg"));
        touch(&dir.path().join("roll.02.jpg"));
        touch(&dir.path().join("b.jpg"));

        let pairs = collect_photo_paths(dir.path()).unwrap();
        let names: Vec<&str> = pairs.iter().filter_map(|p| p.source_name()).collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg", "roll.01.jpg"]);

        let unique: HashSet<&PathBuf> = pairs.iter().map(|p| &p.thumbnail).collect();
        assert_eq!(unique.len(), pairs.len());
    }

    #[test]
    fn test_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("roll.01.jpg");
        touch(&file);

        let pairs = collect_photo_paths(&file).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].source, file);
        assert_eq!(
            pairs[0].thumbnail,
            dir.path().join("thumbnails/roll-thumb.avif")
        );
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_photo_paths(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_source() {
        let err = collect_photo_paths(&PathBuf::from("/nonexistent/photos")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
