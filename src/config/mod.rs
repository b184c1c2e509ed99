mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Environment variables that override file values.
pub const ENV_ACCOUNT_ID: &str = "CLOUDFLARE_ACCOUNT_ID";
pub const ENV_DATABASE_ID: &str = "CLOUDFLARE_D1_ID";
pub const ENV_API_TOKEN: &str = "CLOUDFLARE_D1_TOKEN";
pub const ENV_BUCKET: &str = "S3_BUCKET_NAME";
pub const ENV_ENDPOINT_URL: &str = "AWS_ENDPOINT_URL";

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./gallery.toml",
        "./config.toml",
        "~/.config/gallery-util/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Overlay credentials from the process environment (after `.env` loading).
pub fn apply_env_overrides(config: &mut Config) {
    apply_overrides_from(config, |key| std::env::var(key).ok());
}

/// Overlay credentials using `lookup`; empty values are ignored.
pub fn apply_overrides_from<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get(ENV_ACCOUNT_ID) {
        config.d1.account_id = Some(v);
    }
    if let Some(v) = get(ENV_DATABASE_ID) {
        config.d1.database_id = Some(v);
    }
    if let Some(v) = get(ENV_API_TOKEN) {
        config.d1.api_token = Some(v);
    }
    if let Some(v) = get(ENV_BUCKET) {
        config.storage.bucket = Some(v);
    }
    if let Some(v) = get(ENV_ENDPOINT_URL) {
        config.storage.endpoint_url = Some(v);
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.batch.param_limit == 0 {
        anyhow::bail!("batch.param_limit must be at least 1");
    }

    // Fails early when not even one photo row fits in a statement
    gallery_db::BatchPlanner::for_table::<gallery_db::PhotoRecord>()
        .with_batch_limit(config.batch.param_limit)
        .capacity()
        .context("batch.param_limit is too small for the photo table")?;

    let settings = config.thumbnail.export_settings();
    if settings.width != config.thumbnail.width {
        tracing::warn!(
            "Thumbnail width {} adjusted to {}",
            config.thumbnail.width,
            settings.width
        );
    }
    if u32::from(settings.quality) != config.thumbnail.quality {
        tracing::warn!(
            "Thumbnail quality {} clamped to {}",
            config.thumbnail.quality,
            settings.quality
        );
    }
    if u32::from(settings.effort) != config.thumbnail.effort {
        tracing::warn!(
            "Encoder effort {} clamped to {}",
            config.thumbnail.effort,
            settings.effort
        );
    }

    if config.d1.api_base.trim().is_empty() {
        anyhow::bail!("d1.api_base cannot be empty");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.thumbnail.width, 1000);
        assert_eq!(config.thumbnail.quality, 75);
        assert_eq!(config.thumbnail.effort, 4);
        assert!(!config.thumbnail.overwrite);
        assert_eq!(config.batch.param_limit, 100);
        assert_eq!(config.storage.region, "auto");
        assert_eq!(config.d1.api_base, "https://api.cloudflare.com/client/v4");
        validate_config(&config).unwrap();
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: Config = toml::from_str(
            r#"
[thumbnail]
width = 640
overwrite = true

[metadata]
camera_model = "OLYMPUS XA2"

[storage]
bucket = "photos"
"#,
        )
        .unwrap();

        assert_eq!(config.thumbnail.width, 640);
        assert_eq!(config.thumbnail.quality, 75);
        assert!(config.thumbnail.overwrite);
        assert_eq!(config.metadata.camera_model.as_deref(), Some("OLYMPUS XA2"));
        assert_eq!(config.storage.bucket.as_deref(), Some("photos"));
        assert_eq!(config.storage.region, "auto");
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gallery.toml");
        std::fs::write(&path, "[batch]\nparam_limit = 50\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.batch.param_limit, 50);
    }

    #[test]
    fn test_load_config_rejects_narrow_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gallery.toml");
        std::fs::write(&path, "[batch]\nparam_limit = 8\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("too small"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Path::new("/nonexistent/gallery.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_overrides_from_lookup() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_ACCOUNT_ID, "acct"),
            (ENV_DATABASE_ID, "db-uuid"),
            (ENV_API_TOKEN, "token"),
            (ENV_BUCKET, ""),
        ]);
        let mut config = Config::default();
        config.storage.bucket = Some("from-file".to_string());

        apply_overrides_from(&mut config, |k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.d1.account_id.as_deref(), Some("acct"));
        assert_eq!(config.d1.database_id.as_deref(), Some("db-uuid"));
        assert_eq!(config.d1.api_token.as_deref(), Some("token"));
        // Empty values do not clobber file settings
        assert_eq!(config.storage.bucket.as_deref(), Some("from-file"));
        assert_eq!(config.storage.endpoint_url, None);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        std::env::set_var(ENV_ENDPOINT_URL, "https://example.r2.cloudflarestorage.com");
        let mut config = Config::default();
        apply_env_overrides(&mut config);
        std::env::remove_var(ENV_ENDPOINT_URL);

        assert_eq!(
            config.storage.endpoint_url.as_deref(),
            Some("https://example.r2.cloudflarestorage.com")
        );
    }
}
