//! Thumbnail generation.
//!
//! Thumbnails are encoded in parallel on a rayon pool sized to the CPU
//! count. A failure on one image is logged and counted; it never stops the
//! rest of the batch.

mod encoder;
mod settings;

pub use encoder::encode_thumbnail;
pub use settings::{
    ExportSettings, DEFAULT_EFFORT, DEFAULT_QUALITY, DEFAULT_WIDTH, MAX_EFFORT, MIN_WIDTH,
};

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use gallery_common::PhotoPaths;
use rayon::prelude::*;
use tracing::{debug, error, info};

/// What to do when a thumbnail already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwritePolicy {
    #[default]
    Skip,
    Overwrite,
}

/// Result of processing a single pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailOutcome {
    Generated,
    Skipped,
}

/// Counts for a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThumbnailReport {
    pub generated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Generate the thumbnail for one pair, honouring `policy`.
pub fn generate_thumbnail(
    paths: &PhotoPaths,
    settings: &ExportSettings,
    policy: OverwritePolicy,
) -> Result<ThumbnailOutcome> {
    if policy == OverwritePolicy::Skip && paths.thumbnail.is_file() {
        debug!(
            "Skipping thumbnail generation, {} already exists",
            paths.thumbnail.display()
        );
        return Ok(ThumbnailOutcome::Skipped);
    }

    encode_thumbnail(&paths.source, &paths.thumbnail, settings)?;
    Ok(ThumbnailOutcome::Generated)
}

/// Generate thumbnails for every pair in parallel.
pub fn generate_all(
    pairs: &[PhotoPaths],
    settings: &ExportSettings,
    policy: OverwritePolicy,
) -> Result<ThumbnailReport> {
    info!(
        "Beginning thumbnail generation for {} images (width {}, quality {}, effort {})",
        pairs.len(),
        settings.width,
        settings.quality,
        settings.effort
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_cpus::get())
        .build()
        .context("Failed to build thumbnail thread pool")?;

    let processed = AtomicUsize::new(0);
    let total = pairs.len();

    let outcomes: Vec<Option<ThumbnailOutcome>> = pool.install(|| {
        pairs
            .par_iter()
            .map(|paths| {
                let outcome = match generate_thumbnail(paths, settings, policy) {
                    Ok(outcome) => Some(outcome),
                    Err(e) => {
                        error!("Thumbnail generation failed for {}: {:#}", paths.source.display(), e);
                        None
                    }
                };
                let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
                debug!("Processed {}/{} images", done, total);
                outcome
            })
            .collect()
    });

    let mut report = ThumbnailReport::default();
    for outcome in outcomes {
        match outcome {
            Some(ThumbnailOutcome::Generated) => report.generated += 1,
            Some(ThumbnailOutcome::Skipped) => report.skipped += 1,
            None => report.failed += 1,
        }
    }

    info!(
        "Thumbnails: {} generated, {} skipped, {} failed",
        report.generated, report.skipped, report.failed
    );

    Ok(report)
}
