//! lbcerts CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use lbcerts::cli::{Cli, CommandDispatcher};
use lbcerts::config::load_settings;
use lbcerts::messages::{ConsoleMessages, MessageTheme, Messages};
use lbcerts::LbError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("lbcerts=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lbcerts=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("lbcerts starting with args: {:?}", cli);

    let theme = if cli.no_color {
        MessageTheme::plain()
    } else {
        MessageTheme::new()
    };
    let mut messages = ConsoleMessages::new(theme).quiet(cli.quiet);

    let mut settings = match load_settings(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e @ LbError::ConfigNotFound { .. }) => {
            messages.error(&format!("Error: {}", e));
            messages.error("Create lbcerts.yml or pass --config <PATH>.");
            return ExitCode::from(2);
        }
        Err(e) => {
            messages.error(&format!("Error: {}", e));
            return ExitCode::from(2);
        }
    };
    if let Some(tenant) = &cli.tenant {
        settings.controller.tenant = tenant.clone();
    }

    let dispatcher = CommandDispatcher::new(settings);
    match dispatcher.dispatch(&cli.command, &mut messages) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            messages.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
