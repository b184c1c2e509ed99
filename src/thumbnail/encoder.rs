//! Single-image thumbnail encoding.
//!
//! Decodes a source image, shrinks it to the target width when it is wider,
//! and writes it as AVIF.

use std::path::Path;

use anyhow::{Context, Result};
use image::codecs::avif::AvifEncoder;
use image::imageops::FilterType;
use image::DynamicImage;

use super::settings::ExportSettings;

/// Encode `source` as an AVIF thumbnail at `target`.
///
/// The parent directory of `target` is created if needed. Returns the
/// `(width, height)` of the written thumbnail.
pub fn encode_thumbnail(
    source: &Path,
    target: &Path,
    settings: &ExportSettings,
) -> Result<(u32, u32)> {
    let img = image::open(source)
        .with_context(|| format!("Failed to decode image: {}", source.display()))?;

    // Downscale only
    let thumb = if img.width() > settings.width {
        img.resize(settings.width, u32::MAX, FilterType::Lanczos3)
    } else {
        img
    };

    // The AVIF encoder takes 8-bit RGB(A)
    let thumb = if thumb.color().has_alpha() {
        DynamicImage::ImageRgba8(thumb.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(thumb.to_rgb8())
    };

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create thumbnail directory: {}", parent.display())
        })?;
    }

    let mut buf = Vec::new();
    let encoder =
        AvifEncoder::new_with_speed_quality(&mut buf, settings.encoder_speed(), settings.quality);
    thumb
        .write_with_encoder(encoder)
        .with_context(|| format!("Failed to encode thumbnail: {}", target.display()))?;

    if let Err(e) = std::fs::write(target, &buf) {
        // A partial file would be skipped as existing on the next run
        if target.is_file() {
            let _ = std::fs::remove_file(target);
        }
        return Err(anyhow::Error::new(e)
            .context(format!("Failed to write thumbnail file: {}", target.display())));
    }

    Ok((thumb.width(), thumb.height()))
}
