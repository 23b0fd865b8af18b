//! Settings loading and validation.
//!
//! - Schema definitions in [`schema`]
//! - File discovery, loading and environment overrides in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use lbcerts::config::{load_settings, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let path = temp.path().join("lbcerts.yml");
//! fs::write(&path, "controller:\n  address: https://lb.local\n").unwrap();
//!
//! let settings = load_settings(Some(&path)).unwrap();
//! validate(&settings).unwrap();
//! assert_eq!(settings.uploads.max_size, 16 * 1024);
//! ```

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{
    apply_env_overrides, config_path, load_settings, load_settings_file, parse_settings,
    CONFIG_ENV, DEFAULT_CONFIG_FILE, ENV_OVERRIDES,
};
pub use schema::{AnalyticsSettings, ControllerSettings, Settings, UploadSettings};
pub use validator::{validate, validate_settings, ValidationError};
