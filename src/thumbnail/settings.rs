//! Thumbnail export settings.

/// Default thumbnail width in pixels.
pub const DEFAULT_WIDTH: u32 = 1000;
/// Smallest width a thumbnail may be generated at.
pub const MIN_WIDTH: u32 = 64;
/// Default AVIF quality.
pub const DEFAULT_QUALITY: u8 = 75;
/// Default encoder effort.
pub const DEFAULT_EFFORT: u8 = 4;
/// Highest encoder effort.
pub const MAX_EFFORT: u8 = 9;

/// Clamped encoder settings for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSettings {
    /// Target width; images already narrower keep their size.
    pub width: u32,
    /// Quality, 0-100.
    pub quality: u8,
    /// Effort, 0 (fastest) to 9 (slowest).
    pub effort: u8,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            quality: DEFAULT_QUALITY,
            effort: DEFAULT_EFFORT,
        }
    }
}

impl ExportSettings {
    /// Build settings, clamping each value into its accepted range.
    pub fn new(width: u32, quality: u32, effort: u32) -> Self {
        Self {
            width: width.max(MIN_WIDTH),
            quality: quality.min(100) as u8,
            effort: effort.min(u32::from(MAX_EFFORT)) as u8,
        }
    }

    /// AVIF encoder speed, 1 (slowest) to 10 (fastest).
    pub fn encoder_speed(&self) -> u8 {
        10 - self.effort.min(MAX_EFFORT)
    }
}
