//! Read-only views shown next to the workflows.
//!
//! - [`CertificatesTab`] - certificate list, tolerant of controller failures
//! - [`AnalyticsTab`] - session handle for the embedded analytics frame

pub mod analytics;
pub mod certificates;

pub use analytics::{AnalyticsContext, AnalyticsTab, AssetInstaller, ANALYTICS_TEMPLATE};
pub use certificates::CertificatesTab;
