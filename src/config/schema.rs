//! Settings file schema.
//!
//! ```yaml
//! controller:
//!   address: https://controller.example.com
//!   username: admin
//!   password: secret
//!   tenant: admin
//!   timeout_secs: 30
//!   verify_tls: true
//! uploads:
//!   max_size: 16384
//! analytics:
//!   template_source: assets/lb_analytics.html
//!   template_dir: templates
//! ```

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::forms::DEFAULT_MAX_UPLOAD;

/// Root of `lbcerts.yml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How to reach the load balancer controller
    pub controller: ControllerSettings,

    /// Limits on uploaded key and certificate files
    pub uploads: UploadSettings,

    /// Embedded analytics tab
    pub analytics: AnalyticsSettings,
}

/// Controller connection.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerSettings {
    /// Base URL, e.g. `https://10.0.0.5`
    pub address: String,

    pub username: String,

    #[serde(skip_serializing)]
    pub password: String,

    /// Tenant used when the caller does not name one
    pub tenant: String,

    /// Per-request timeout
    pub timeout_secs: u64,

    /// Verify the controller's TLS certificate
    pub verify_tls: bool,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            address: String::new(),
            username: "admin".to_string(),
            password: String::new(),
            tenant: "admin".to_string(),
            timeout_secs: 30,
            verify_tls: true,
        }
    }
}

impl fmt::Debug for ControllerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerSettings")
            .field("address", &self.address)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("tenant", &self.tenant)
            .field("timeout_secs", &self.timeout_secs)
            .field("verify_tls", &self.verify_tls)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    /// Largest accepted key or certificate file, in bytes
    pub max_size: usize,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_UPLOAD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    /// Template shipped with the dashboard
    pub template_source: PathBuf,

    /// Directory the host renders templates from
    pub template_dir: PathBuf,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            template_source: PathBuf::from("assets/lb_analytics.html"),
            template_dir: PathBuf::from("templates"),
        }
    }
}
