//! Controller service boundary.
//!
//! Certificates, pools and virtual services live on the load balancer
//! controller. This module defines the calls the workflows and tabs make:
//!
//! - [`ControllerApi`] - the six controller operations, as a trait
//! - [`HttpController`] - REST implementation over a blocking HTTP client
//! - [`MockController`] - in-memory implementation for tests and examples
//! - [`ServiceError`] - the narrow error every call returns
//!
//! Callers decide per call site whether a failure is tolerated (the
//! certificate list tab) or reported as a workflow failure (commits).

pub mod http;
pub mod mock;

pub use http::HttpController;
pub use mock::{MockController, MockOperation};

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::workflow::Context;

/// Error returned by controller calls.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The controller could not be reached or did not answer in time.
    #[error("Controller unavailable: {message}")]
    Unavailable { message: String },

    /// The controller answered with a non-success status.
    #[error("Controller rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The requested object does not exist.
    #[error("Not found: {what}")]
    NotFound { what: String },

    /// The controller answered with something we could not interpret.
    #[error("Unexpected controller response: {message}")]
    Protocol { message: String },
}

impl ServiceError {
    /// Whether the failure is on the transport side rather than a refusal.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Result type alias for controller calls.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// A certificate as listed by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateSummary {
    /// Controller identifier.
    pub id: String,
    /// Unique certificate name, used for association by reference.
    pub name: String,
    /// Expiry timestamp as reported by the controller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
}

impl CertificateSummary {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            expires: None,
        }
    }

    /// Parsed expiry, if the controller reported one in its
    /// `YYYY-MM-DD HH:MM:SS` (UTC) format.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.expires.as_deref()?;
        NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%d %H:%M:%S")
            .ok()
            .map(|t| t.and_utc())
    }

    /// Whether the certificate expired before `now`. Unknown expiry counts
    /// as not expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|t| t <= now)
    }
}

/// Staged material for a certificate upload.
#[derive(Clone, PartialEq, Eq)]
pub struct NewCertificate {
    pub name: String,
    pub key_data: String,
    pub cert_data: String,
    pub passphrase: String,
}

impl NewCertificate {
    /// Build the upload arguments from a completed workflow context.
    ///
    /// Keys the context does not hold are sent as empty strings, which is
    /// what the controller receives for an empty inline field.
    pub fn from_context(context: &Context) -> Self {
        let get = |key: &str| context.get(key).unwrap_or_default().to_string();
        Self {
            name: get("name"),
            key_data: get("key_data"),
            cert_data: get("cert_data"),
            passphrase: get("passphrase"),
        }
    }
}

impl fmt::Debug for NewCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewCertificate")
            .field("name", &self.name)
            .field("key_data", &format_args!("[{} bytes]", self.key_data.len()))
            .field("cert_data", &format_args!("[{} bytes]", self.cert_data.len()))
            .field("passphrase", &"[REDACTED]")
            .finish()
    }
}

/// Certificates to attach to a pool and its virtual IP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateAssociation {
    pub pool_id: String,
    pub vip_id: String,
    pub pool_cert: String,
    pub vip_cert: String,
}

impl CertificateAssociation {
    pub fn from_context(context: &Context) -> Self {
        let get = |key: &str| context.get(key).unwrap_or_default().to_string();
        Self {
            pool_id: get("pool_id"),
            vip_id: get("vip_id"),
            pool_cert: get("pool_cert"),
            vip_cert: get("vip_cert"),
        }
    }
}

/// Session handle an embedded analytics frame needs to talk to the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub controller_address: String,
    pub anti_forgery_token: String,
    pub session_id: String,
    pub tenant: String,
}

/// Operations offered by the load balancer controller.
///
/// Every call is synchronous and applies its own timeout policy.
pub trait ControllerApi {
    /// List certificates visible to `tenant`.
    fn list_certificates(&self, tenant: &str) -> ServiceResult<Vec<CertificateSummary>>;

    /// Upload a new certificate.
    fn create_certificate(&self, certificate: &NewCertificate) -> ServiceResult<CertificateSummary>;

    /// Attach certificates to a pool and a virtual IP by name.
    fn associate_certificates(&self, association: &CertificateAssociation) -> ServiceResult<()>;

    /// Name of the certificate currently attached to a pool.
    fn get_pool_certificate(&self, pool_id: &str) -> ServiceResult<Option<String>>;

    /// Name of the certificate currently attached to a virtual IP.
    fn get_vip_certificate(&self, vip_id: &str) -> ServiceResult<Option<String>>;

    /// Current controller session.
    fn session_info(&self) -> ServiceResult<SessionInfo>;
}
