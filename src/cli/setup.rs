use crate::core::config::AppConfig;
use anyhow::{Context, Result, bail};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::info;

const EXAMPLE_CONFIG: &str = include_str!("../../docs/example_config.yaml");

/// Writes the example configuration for `--setup`, either to `config_path`
/// or to the platform config directory. Returns the path written.
pub fn write_example_config(config_path: Option<&Path>) -> Result<PathBuf> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => AppConfig::default_config_path()?,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Could not create config directory {}", parent.display()))?;
    }

    // create_new refuses to clobber a config the user already has
    let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            bail!(
                "Refusing to overwrite existing config at {}",
                path.display()
            )
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Could not create {}", path.display()));
        }
    };
    file.write_all(EXAMPLE_CONFIG.as_bytes())
        .with_context(|| format!("Could not write example config to {}", path.display()))?;

    info!(path = %path.display(), "Wrote example config");
    Ok(path)
}
