use serde::{Deserialize, Serialize};

use crate::thumbnail::{ExportSettings, OverwritePolicy};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub thumbnail: ThumbnailConfig,

    #[serde(default)]
    pub d1: D1Config,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub metadata: MetadataConfig,

    #[serde(default)]
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ThumbnailConfig {
    /// Target width in pixels (floor 64)
    #[serde(default = "default_width")]
    pub width: u32,

    /// AVIF quality, 0-100
    #[serde(default = "default_quality")]
    pub quality: u32,

    /// Encoder effort, 0 (fastest) to 9 (slowest)
    #[serde(default = "default_effort")]
    pub effort: u32,

    /// Regenerate thumbnails that already exist
    #[serde(default)]
    pub overwrite: bool,
}

fn default_width() -> u32 {
    crate::thumbnail::DEFAULT_WIDTH
}
fn default_quality() -> u32 {
    u32::from(crate::thumbnail::DEFAULT_QUALITY)
}
fn default_effort() -> u32 {
    u32::from(crate::thumbnail::DEFAULT_EFFORT)
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            quality: default_quality(),
            effort: default_effort(),
            overwrite: false,
        }
    }
}

impl ThumbnailConfig {
    /// Clamped encoder settings.
    pub fn export_settings(&self) -> ExportSettings {
        ExportSettings::new(self.width, self.quality, self.effort)
    }

    pub fn overwrite_policy(&self) -> OverwritePolicy {
        if self.overwrite {
            OverwritePolicy::Overwrite
        } else {
            OverwritePolicy::Skip
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct D1Config {
    #[serde(default)]
    pub account_id: Option<String>,

    #[serde(default)]
    pub database_id: Option<String>,

    /// API token with D1 edit permission (prefer CLOUDFLARE_D1_TOKEN)
    #[serde(default)]
    pub api_token: Option<String>,

    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_api_base() -> String {
    "https://api.cloudflare.com/client/v4".to_string()
}

impl Default for D1Config {
    fn default() -> Self {
        Self {
            account_id: None,
            database_id: None,
            api_token: None,
            api_base: default_api_base(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub bucket: Option<String>,

    /// S3-compatible endpoint, e.g. `https://<account>.r2.cloudflarestorage.com`
    #[serde(default)]
    pub endpoint_url: Option<String>,

    #[serde(default = "default_region")]
    pub region: String,

    /// Uploads in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_region() -> String {
    "auto".to_string()
}

fn default_concurrency() -> usize {
    4
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: None,
            endpoint_url: None,
            region: default_region(),
            concurrency: default_concurrency(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MetadataConfig {
    /// Camera model recorded for every photo
    #[serde(default)]
    pub camera_model: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchConfig {
    /// Bound parameters allowed per statement
    #[serde(default = "default_param_limit")]
    pub param_limit: usize,
}

fn default_param_limit() -> usize {
    gallery_db::BATCH_PARAM_LIMIT
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            param_limit: default_param_limit(),
        }
    }
}
