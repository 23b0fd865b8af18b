//! Analytics command implementation.
//!
//! Prints what the analytics tab would hand to its template.

use std::sync::Arc;

use anyhow::Context as _;

use crate::cli::args::AnalyticsArgs;
use crate::error::Result;
use crate::tabs::{AnalyticsTab, AssetInstaller};
use crate::workflow::Request;

use super::dispatcher::{Command, CommandResult};

/// The analytics command implementation.
pub struct AnalyticsCommand {
    args: AnalyticsArgs,
    tab: AnalyticsTab,
}

impl AnalyticsCommand {
    /// Create a new analytics command.
    pub fn new(args: AnalyticsArgs, installer: Arc<AssetInstaller>) -> Self {
        Self {
            args,
            tab: AnalyticsTab::new(installer),
        }
    }
}

impl Command for AnalyticsCommand {
    fn execute(&self, request: &mut Request<'_>) -> Result<CommandResult> {
        let template = self.tab.template_name()?;
        let Some(context) = self.tab.context_data(request) else {
            return Ok(CommandResult::failure(1));
        };

        if self.args.json {
            let json = serde_json::to_string_pretty(&context).context("Failed to encode session")?;
            println!("{}", json);
        } else {
            println!("template:           {}", template);
            println!("controller_address: {}", context.controller_address);
            println!("tenant_name:        {}", context.tenant_name);
            println!("session_id:         {}", context.session_id);
            println!("anti_forgery_token: {}", context.anti_forgery_token);
        }
        Ok(CommandResult::success())
    }
}
