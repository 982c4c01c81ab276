use std::path::{Path, PathBuf};

use stow_core::{ClientConfig, ConfigError};
use tracing::info;

const DEFAULT_PATHS: [&str; 2] = ["stow.toml", "/etc/stow/stow.toml"];

/// Load configuration from `explicit` if given, else the first existing
/// default path, else defaults. `STOW_BUCKET` and `STOW_QUEUE_URL` override
/// the file.
pub fn load_config(explicit: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    let mut config = match explicit {
        Some(path) => ClientConfig::from_file(path)?,
        None => match first_existing(&DEFAULT_PATHS) {
            Some(path) => {
                let config = ClientConfig::from_file(&path)?;
                info!(path = %path.display(), "loaded configuration");
                config
            }
            None => {
                info!("no config file found, using defaults");
                ClientConfig::default()
            }
        },
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

fn first_existing(paths: &[&str]) -> Option<PathBuf> {
    paths.iter().map(PathBuf::from).find(|p| p.exists())
}

fn apply_env_overrides(config: &mut ClientConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(bucket) = var("STOW_BUCKET").filter(|v| !v.is_empty()) {
        config.offload.bucket_name = Some(bucket);
    }
    if let Some(queue_url) = var("STOW_QUEUE_URL").filter(|v| !v.is_empty()) {
        config.queue.queue_url = Some(queue_url);
    }
}
