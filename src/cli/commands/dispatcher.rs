//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::sync::Arc;

use tracing::debug;

use crate::cli::args::Commands;
use crate::config::Settings;
use crate::error::Result;
use crate::messages::Messages;
use crate::service::HttpController;
use crate::tabs::AssetInstaller;
use crate::workflow::Request;

use super::add::AddCommand;
use super::analytics::AnalyticsCommand;
use super::associate::AssociateCommand;
use super::choices::ChoicesCommand;
use super::install_asset::InstallAssetCommand;
use super::list::ListCommand;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command for one request.
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, request: &mut Request<'_>) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    settings: Settings,
    installer: Arc<AssetInstaller>,
}

impl CommandDispatcher {
    /// Create a dispatcher for already validated settings.
    pub fn new(settings: Settings) -> Self {
        let installer = Arc::new(AssetInstaller::new(
            &settings.analytics.template_source,
            &settings.analytics.template_dir,
        ));
        Self {
            settings,
            installer,
        }
    }

    /// Connect to the controller if needed, then execute `command`.
    pub fn dispatch(&self, command: &Commands, messages: &mut dyn Messages) -> Result<CommandResult> {
        if let Commands::InstallAsset = command {
            return InstallAssetCommand::new(Arc::clone(&self.installer)).install(messages);
        }

        let controller = HttpController::connect(&self.settings.controller)?;
        debug!("Connected to controller at {}", controller.base_url());
        let mut request = Request::new(self.settings.controller.tenant.clone(), &controller, messages);
        self.dispatch_with(command, &mut request)
    }

    /// Execute `command` against an existing request.
    pub fn dispatch_with(&self, command: &Commands, request: &mut Request<'_>) -> Result<CommandResult> {
        match command {
            Commands::List(args) => ListCommand::new(args.clone()).execute(request),
            Commands::Add(args) => {
                AddCommand::new(args.clone(), self.settings.uploads.max_size).execute(request)
            }
            Commands::Associate(args) => AssociateCommand::new(args.clone()).execute(request),
            Commands::Choices(args) => ChoicesCommand::new(args.clone()).execute(request),
            Commands::Analytics(args) => {
                AnalyticsCommand::new(args.clone(), Arc::clone(&self.installer)).execute(request)
            }
            Commands::InstallAsset => {
                InstallAssetCommand::new(Arc::clone(&self.installer)).execute(request)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::ListArgs;
    use crate::messages::MessageLog;
    use crate::service::{MockController, MockOperation};

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(1);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn dispatches_list_to_request_controller() {
        let dispatcher = CommandDispatcher::new(Settings::default());
        let controller = MockController::new()
            .with_certificates(&["web"])
            .unavailable(MockOperation::Session);
        let mut log = MessageLog::new();
        let mut request = Request::new("admin", &controller, &mut log);

        let result = dispatcher
            .dispatch_with(&Commands::List(ListArgs::default()), &mut request)
            .unwrap();

        assert_eq!(result, CommandResult::success());
        assert_eq!(controller.calls(), vec!["list_certificates"]);
    }
}
