mod cli;

use gallery_util::{config, d1::D1Client, pipeline};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use gallery_db::collections::parse_collection_list;
use std::path::Path;

/// File config, then `.env`/environment, then CLI flags.
fn load_settings(config_path: Option<&Path>) -> Result<config::Config> {
    let mut config = config::load_config_or_default(config_path)?;
    config::apply_env_overrides(&mut config);
    Ok(config)
}

#[allow(clippy::too_many_arguments)]
fn process(
    config_path: Option<&Path>,
    source: &Path,
    width: Option<u32>,
    quality: Option<u32>,
    effort: Option<u32>,
    collections: Option<String>,
    camera_model: Option<String>,
    flags: pipeline::RunOptions,
    overwrite: bool,
) -> Result<()> {
    let mut config = load_settings(config_path)?;

    if let Some(width) = width {
        config.thumbnail.width = width;
    }
    if let Some(quality) = quality {
        config.thumbnail.quality = quality;
    }
    if let Some(effort) = effort {
        config.thumbnail.effort = effort;
    }
    if overwrite {
        config.thumbnail.overwrite = true;
    }
    if camera_model.is_some() {
        config.metadata.camera_model = camera_model;
    }
    config::validate_config(&config)?;

    let options = pipeline::RunOptions {
        source: source.to_path_buf(),
        collections: collections
            .as_deref()
            .map(parse_collection_list)
            .unwrap_or_default(),
        ..flags
    };

    let rt = tokio::runtime::Runtime::new()?;
    let summary = rt.block_on(pipeline::run(&config, &options))?;

    if options.dry_run {
        return Ok(());
    }

    tracing::info!("Photos found: {}", summary.photos);
    if let Some(report) = &summary.thumbnails {
        tracing::info!(
            "Thumbnails: {} generated, {} skipped, {} failed",
            report.generated,
            report.skipped,
            report.failed
        );
    }
    if let Some(changes) = summary.rows_changed {
        tracing::info!("D1: {} statements, {} rows changed", summary.statements, changes);
    }
    if let Some(uploads) = &summary.uploads {
        tracing::info!(
            "Uploads: {} succeeded, {} failed",
            uploads.uploaded,
            uploads.failed.len()
        );
    }
    Ok(())
}

fn init_db(config_path: Option<&Path>, dry_run: bool) -> Result<()> {
    let plan = gallery_db::schema::create_table_statements();

    if dry_run {
        return pipeline::print_plan(&plan);
    }

    let config = load_settings(config_path)?;
    let client = D1Client::from_config(&config.d1)?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(client.batch(&plan))?;
    println!("✓ Created {} tables", plan.len());
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let mut config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            config::load_config(p)?
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };
    config::apply_env_overrides(&mut config);

    let settings = config.thumbnail.export_settings();
    println!("✓ Configuration is valid");
    println!(
        "  Thumbnail: width {}, quality {}, effort {}",
        settings.width, settings.quality, settings.effort
    );
    println!("  Overwrite existing: {}", config.thumbnail.overwrite);
    println!("  Parameter limit: {}", config.batch.param_limit);
    println!(
        "  D1 credentials: {}",
        if config.d1.account_id.is_some()
            && config.d1.database_id.is_some()
            && config.d1.api_token.is_some()
        {
            "configured"
        } else {
            "missing (set in config or environment)"
        }
    );
    println!(
        "  Bucket: {}",
        config.storage.bucket.as_deref().unwrap_or("(not set)")
    );
    Ok(())
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "gallery_util=trace,gallery_db=debug,gallery_common=debug".to_string()
        } else {
            "gallery_util=info,gallery_db=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Process {
            source,
            width,
            quality,
            effort,
            collections,
            camera_model,
            offline_only,
            upload_only,
            overwrite,
            dry_run,
        } => process(
            cli.config.as_deref(),
            &source,
            width,
            quality,
            effort,
            collections,
            camera_model,
            pipeline::RunOptions {
                offline_only,
                upload_only,
                dry_run,
                ..Default::default()
            },
            overwrite,
        ),
        Commands::InitDb { dry_run } => init_db(cli.config.as_deref(), dry_run),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
    }
}
