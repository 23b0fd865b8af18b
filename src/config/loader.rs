//! Settings discovery and loading.
//!
//! The settings file is found in this order:
//! 1. An explicit path (the `--config` flag)
//! 2. `$LBCERTS_CONFIG`
//! 3. `lbcerts.yml` in the current directory
//!
//! Environment overrides are applied on top of the file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::schema::Settings;
use crate::config::validator::validate;
use crate::error::{LbError, Result};

/// Environment variable naming the settings file.
pub const CONFIG_ENV: &str = "LBCERTS_CONFIG";

/// Settings file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "lbcerts.yml";

/// Environment variables that override controller settings.
pub const ENV_OVERRIDES: &[&str] = &[
    "LBCERTS_CONTROLLER",
    "LBCERTS_USERNAME",
    "LBCERTS_PASSWORD",
    "LBCERTS_TENANT",
];

/// Resolve which settings file to read.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    config_path_with(explicit, |key| std::env::var(key).ok())
}

fn config_path_with(explicit: Option<&Path>, env: impl Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match env(CONFIG_ENV) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_CONFIG_FILE),
    }
}

/// Load a settings file without validating it.
///
/// # Errors
///
/// `ConfigNotFound` if the file does not exist, `ConfigParseError` if it is
/// not valid YAML for [`Settings`].
pub fn load_settings_file(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LbError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            LbError::Io(e)
        }
    })?;

    parse_settings(&content, path)
}

/// Parse YAML content into [`Settings`].
///
/// `source_path` is only used for error reporting.
pub fn parse_settings(content: &str, source_path: &Path) -> Result<Settings> {
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_yaml::from_str(content).map_err(|e| LbError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Apply `LBCERTS_*` overrides, reading variables through `env`.
pub fn apply_env_overrides(settings: &mut Settings, env: impl Fn(&str) -> Option<String>) {
    let controller = &mut settings.controller;
    let targets = [
        &mut controller.address,
        &mut controller.username,
        &mut controller.password,
        &mut controller.tenant,
    ];
    for (key, target) in ENV_OVERRIDES.iter().zip(targets) {
        if let Some(value) = env(*key).filter(|v| !v.is_empty()) {
            debug!("Overriding controller setting from {}", key);
            *target = value;
        }
    }
}

/// Find, load, override and validate the settings.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    let path = config_path(explicit);
    debug!("Loading settings from {}", path.display());

    let mut settings = load_settings_file(&path)?;
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    validate(&settings)?;
    Ok(settings)
}
