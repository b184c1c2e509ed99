//! The `process` run: scan, generate thumbnails, record metadata in D1 and
//! upload originals and thumbnails.

use std::path::PathBuf;

use anyhow::{Context, Result};
use gallery_common::PhotoPaths;
use gallery_db::collections::{link_statements, plan_collections};
use gallery_db::{BatchPlanner, InsertRow, PhotoRecord, StatementPlan, TemplateCache};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::d1::D1Client;
use crate::scanner::collect_photo_paths;
use crate::storage::{upload_all, S3Store, UploadReport};
use crate::thumbnail::{generate_all, ThumbnailReport};

/// Switches for a single `process` run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub source: PathBuf,
    /// Generate thumbnails only; no D1 or storage calls
    pub offline_only: bool,
    /// Skip generation and publish what already exists
    pub upload_only: bool,
    /// Print the statement plan and exit
    pub dry_run: bool,
    pub collections: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub photos: usize,
    pub thumbnails: Option<ThumbnailReport>,
    pub statements: usize,
    pub rows_changed: Option<u64>,
    pub uploads: Option<UploadReport>,
}

/// Statements recording `pairs` and, when given, their collections.
///
/// Photo rows come first so the collection links can resolve them.
pub fn build_metadata_plan(
    config: &Config,
    pairs: &[PhotoPaths],
    collections: &[String],
) -> Result<StatementPlan> {
    let mut records = Vec::with_capacity(pairs.len());
    for pair in pairs {
        match PhotoRecord::from_paths(pair) {
            Some(record) => {
                records.push(record.with_camera_model(config.metadata.camera_model.clone()))
            }
            None => warn!("Skipping {}: file name is not valid UTF-8", pair),
        }
    }

    let limit = config.batch.param_limit;
    let mut cache = TemplateCache::new();
    let mut plan = BatchPlanner::for_table::<PhotoRecord>()
        .with_batch_limit(limit)
        .plan_cached(records.iter().map(|r| r.values()).collect(), &mut cache)
        .context("Failed to plan photo inserts")?;

    if !collections.is_empty() {
        plan.extend(plan_collections(collections, limit).context("Failed to plan collections")?);

        let filenames: Vec<String> = records.iter().map(|r| r.filename.clone()).collect();
        for collection in collections {
            plan.extend(link_statements(collection, &filenames));
        }
    }

    Ok(plan)
}

/// Write each statement and its parameters to stdout.
pub fn print_plan(plan: &StatementPlan) -> Result<()> {
    for (idx, statement) in plan.iter().enumerate() {
        println!("-- statement {} ({} params)", idx + 1, statement.params.len());
        println!("{}", statement.sql);
        println!("-- params: {}", serde_json::to_string(&statement.params)?);
    }
    Ok(())
}

/// Run the full pipeline for `options.source`.
pub async fn run(config: &Config, options: &RunOptions) -> Result<RunSummary> {
    let source = options.source.clone();
    let pairs = tokio::task::spawn_blocking(move || collect_photo_paths(&source))
        .await
        .context("Scan task panicked")??;

    let mut summary = RunSummary {
        photos: pairs.len(),
        ..RunSummary::default()
    };

    if pairs.is_empty() {
        info!("No new thumbnails found");
        return Ok(summary);
    }

    if options.dry_run {
        let plan = build_metadata_plan(config, &pairs, &options.collections)?;
        summary.statements = plan.len();
        print_plan(&plan)?;
        info!("Dry run: {} statements planned, nothing sent", plan.len());
        return Ok(summary);
    }

    if !options.upload_only {
        let settings = config.thumbnail.export_settings();
        let policy = config.thumbnail.overwrite_policy();
        let work = pairs.clone();
        let report = tokio::task::spawn_blocking(move || generate_all(&work, &settings, policy))
            .await
            .context("Thumbnail task panicked")??;
        summary.thumbnails = Some(report);
    }

    if options.offline_only {
        info!("Offline only, skipping D1 and object storage");
        return Ok(summary);
    }

    let ready = with_thumbnails(pairs);
    if ready.is_empty() {
        warn!("No thumbnails available to publish");
        return Ok(summary);
    }

    let client = D1Client::from_config(&config.d1)?;
    let store = S3Store::from_config(&config.storage).await?;

    let plan = build_metadata_plan(config, &ready, &options.collections)?;
    summary.statements = plan.len();
    match client.batch(&plan).await {
        Ok(envelope) => summary.rows_changed = Some(envelope.total_changes()),
        Err(e) => error!("Failed to record metadata: {:#}", e),
    }

    info!("Uploading {} images to {}", ready.len(), store.bucket());
    summary.uploads = Some(upload_all(&store, &ready, config.storage.concurrency).await);

    Ok(summary)
}

/// Pairs whose thumbnail is on disk.
fn with_thumbnails(pairs: Vec<PhotoPaths>) -> Vec<PhotoPaths> {
    pairs
        .into_iter()
        .filter(|pair| {
            let exists = pair.thumbnail.is_file();
            if !exists {
                warn!("No thumbnail for {}, not publishing it", pair.source.display());
            }
            exists
        })
        .collect()
}
