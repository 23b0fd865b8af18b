//! Install-asset command implementation.
//!
//! The `lbcerts install-asset` command performs the analytics template copy
//! up front, e.g. from a deployment script.

use std::sync::Arc;

use crate::error::Result;
use crate::messages::Messages;
use crate::tabs::AssetInstaller;
use crate::workflow::Request;

use super::dispatcher::{Command, CommandResult};

/// The install-asset command implementation.
pub struct InstallAssetCommand {
    installer: Arc<AssetInstaller>,
}

impl InstallAssetCommand {
    /// Create a new install-asset command.
    pub fn new(installer: Arc<AssetInstaller>) -> Self {
        Self { installer }
    }

    /// Copy the template; needs no controller.
    pub fn install(&self, messages: &mut dyn Messages) -> Result<CommandResult> {
        self.installer.ensure_installed()?;
        messages.success(&format!(
            "Analytics template installed at {}",
            self.installer.destination().display()
        ));
        Ok(CommandResult::success())
    }
}

impl Command for InstallAssetCommand {
    fn execute(&self, request: &mut Request<'_>) -> Result<CommandResult> {
        self.install(request.messages)
    }
}
