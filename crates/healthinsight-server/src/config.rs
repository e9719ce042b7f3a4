//! YAML configuration loading for the prediction server.
//!
//! Loads [`ServerConfig`] from a YAML file on disk, falling back to
//! defaults when no file is specified.

use healthinsight_core::ServerConfig;
use std::path::Path;

/// Load a [`ServerConfig`] from a YAML file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the YAML is invalid.
pub fn load_config(path: &Path) -> anyhow::Result<ServerConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config file {}: {}", path.display(), e))?;
    let config: ServerConfig = serde_yaml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config YAML: {}", e))?;
    Ok(config)
}
