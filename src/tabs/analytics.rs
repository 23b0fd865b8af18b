//! Embedded analytics tab.
//!
//! The tab renders a template that embeds the controller's own analytics UI.
//! That template ships with the crate's assets and has to be copied into the
//! host's template directory before the first render; [`AssetInstaller`]
//! does the copy once per process, even when several workers hit the tab at
//! the same time.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{LbError, Result};
use crate::service::SessionInfo;
use crate::workflow::Request;

/// File name of the analytics template, both at the source and destination.
pub const ANALYTICS_TEMPLATE: &str = "lb_analytics.html";

/// Copies the analytics template into place, at most once.
#[derive(Debug)]
pub struct AssetInstaller {
    source: PathBuf,
    dest_dir: PathBuf,
    installed: AtomicBool,
    lock: Mutex<()>,
}

impl AssetInstaller {
    /// `source` is the template file; it is copied into `dest_dir`.
    pub fn new(source: impl Into<PathBuf>, dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            dest_dir: dest_dir.into(),
            installed: AtomicBool::new(false),
            lock: Mutex::new(()),
        }
    }

    /// Where the template ends up.
    pub fn destination(&self) -> PathBuf {
        self.dest_dir.join(ANALYTICS_TEMPLATE)
    }

    pub fn is_installed(&self) -> bool {
        self.installed.load(Ordering::Acquire)
    }

    /// Copy the template unless this installer already did.
    ///
    /// Returns `true` when this call performed the copy. Callers racing the
    /// first copy block until it finished and then return `false`. A missing
    /// source template is [`LbError::AssetMissing`]; the flag stays unset so
    /// a later call retries.
    pub fn ensure_installed(&self) -> Result<bool> {
        if self.is_installed() {
            return Ok(false);
        }

        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if self.is_installed() {
            return Ok(false);
        }

        if !self.source.is_file() {
            return Err(LbError::AssetMissing {
                path: self.source.clone(),
            });
        }

        fs::create_dir_all(&self.dest_dir)?;
        let destination = self.destination();
        fs::copy(&self.source, &destination)?;
        info!("Installed analytics template to {}", destination.display());

        self.installed.store(true, Ordering::Release);
        Ok(true)
    }
}

/// Values the analytics template needs to open a controller session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsContext {
    pub controller_address: String,
    pub anti_forgery_token: String,
    pub session_id: String,
    pub tenant_name: String,
}

impl From<SessionInfo> for AnalyticsContext {
    fn from(session: SessionInfo) -> Self {
        Self {
            controller_address: session.controller_address,
            anti_forgery_token: session.anti_forgery_token,
            session_id: session.session_id,
            tenant_name: session.tenant,
        }
    }
}

/// The "Analytics" tab.
#[derive(Debug, Clone)]
pub struct AnalyticsTab {
    installer: Arc<AssetInstaller>,
}

impl AnalyticsTab {
    pub const SLUG: &'static str = "analytics";

    pub fn new(installer: Arc<AssetInstaller>) -> Self {
        Self { installer }
    }

    /// Make sure the template is in place. Safe to call on every render.
    pub fn ensure_asset_installed(&self) -> Result<()> {
        if self.installer.ensure_installed()? {
            debug!("Analytics template installed on first use");
        }
        Ok(())
    }

    /// Template to render, installing it first if needed.
    pub fn template_name(&self) -> Result<&'static str> {
        self.ensure_asset_installed()?;
        Ok(ANALYTICS_TEMPLATE)
    }

    /// Session handle for the embedded frame.
    ///
    /// On failure the user gets an error message and the tab has nothing to
    /// render.
    pub fn context_data(&self, request: &mut Request<'_>) -> Option<AnalyticsContext> {
        match request.controller.session_info() {
            Ok(session) => Some(session.into()),
            Err(err) => {
                warn!("Tab '{}' failed to open a session: {}", Self::SLUG, err);
                request.messages.error("Unable to open analytics session");
                None
            }
        }
    }
}
