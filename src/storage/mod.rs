//! Object storage upload.
//!
//! Originals and thumbnails are stored under their base file names. A
//! failed upload is logged and counted; the remaining files still go up.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use aws_sdk_s3::primitives::ByteStream;
use futures::stream::{self, StreamExt};
use gallery_common::PhotoPaths;

use crate::config::StorageConfig;

/// Destination for uploaded files.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload the file at `path` under `key`.
    async fn put_file(&self, path: &Path, key: &str) -> Result<()>;
}

/// S3-compatible store (Cloudflare R2 with region `auto`).
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build a store from config. Access keys come from the standard AWS
    /// credential chain (`AWS_ACCESS_KEY_ID`/`AWS_SECRET_ACCESS_KEY`).
    pub async fn from_config(config: &StorageConfig) -> Result<Self> {
        let bucket = config
            .bucket
            .as_deref()
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Missing storage.bucket (set it in the config file or {})",
                    crate::config::ENV_BUCKET
                )
            })?;

        tracing::info!("Connecting to object storage...");
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()));
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        Ok(Self::new(aws_sdk_s3::Client::from_conf(s3_config), bucket))
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3Store {
    async fn put_file(&self, path: &Path, key: &str) -> Result<()> {
        let body = ByteStream::from_path(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body);
        if let Some(content_type) = content_type_for(path) {
            request = request.content_type(content_type);
        }

        request
            .send()
            .await
            .with_context(|| format!("Failed to upload {} to {}/{}", path.display(), self.bucket, key))?;
        Ok(())
    }
}

/// MIME type for the image formats the gallery stores.
pub fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    let mime = match ext.as_str() {
        "avif" => "image/avif",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        _ => return None,
    };
    Some(mime)
}

/// Counts for an upload run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub uploaded: usize,
    pub failed: Vec<PathBuf>,
}

/// Object key for a local file: its base file name.
pub fn object_key(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
}

/// Upload every original and thumbnail in `pairs`.
///
/// At most `concurrency` uploads are in flight at once.
pub async fn upload_all(
    store: &dyn ObjectStore,
    pairs: &[PhotoPaths],
    concurrency: usize,
) -> UploadReport {
    let files: Vec<&Path> = pairs
        .iter()
        .flat_map(|p| [p.source.as_path(), p.thumbnail.as_path()])
        .collect();

    let results: Vec<(PathBuf, Result<()>)> = stream::iter(files)
        .map(|path| async move {
            let result = match object_key(path) {
                Some(key) => store.put_file(path, &key).await,
                None => Err(anyhow::anyhow!("{} has no usable file name", path.display())),
            };
            (path.to_path_buf(), result)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut report = UploadReport::default();
    for (path, result) in results {
        match result {
            Ok(()) => report.uploaded += 1,
            Err(e) => {
                tracing::error!("{:#}", e);
                report.failed.push(path);
            }
        }
    }
    report.failed.sort();

    tracing::info!(
        "Completed uploading {} images ({} files uploaded, {} failed)",
        pairs.len(),
        report.uploaded,
        report.failed.len()
    );
    report
}
