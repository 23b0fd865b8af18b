//! List command implementation.
//!
//! The `lbcerts list` command shows the certificates tab.

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use console::Style;

use crate::cli::args::ListArgs;
use crate::error::Result;
use crate::service::CertificateSummary;
use crate::tabs::CertificatesTab;
use crate::workflow::Request;

use super::dispatcher::{Command, CommandResult};

/// The list command implementation.
pub struct ListCommand {
    args: ListArgs,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(args: ListArgs) -> Self {
        Self { args }
    }
}

/// Render certificate rows as aligned columns, flagging those expired
/// at `now`.
pub fn format_table(rows: &[CertificateSummary], now: DateTime<Utc>) -> Vec<String> {
    let width = rows
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("NAME".len());
    let header = Style::new().bold();
    let expired = Style::new().red();

    let mut lines = vec![format!(
        "{}  {}",
        header.apply_to(format!("{:<width$}", "NAME", width = width)),
        header.apply_to("EXPIRES")
    )];
    for row in rows {
        let expires = row.expires.as_deref().unwrap_or("-");
        let expires = if row.is_expired_at(now) {
            expired.apply_to(format!("{} (expired)", expires)).to_string()
        } else {
            expires.to_string()
        };
        lines.push(format!("{:<width$}  {}", row.name, expires, width = width));
    }
    lines
}

impl Command for ListCommand {
    fn execute(&self, request: &mut Request<'_>) -> Result<CommandResult> {
        let rows = CertificatesTab.table_data(request);

        if self.args.json {
            let json = serde_json::to_string_pretty(&rows).context("Failed to encode certificates")?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        if rows.is_empty() {
            request
                .messages
                .info(&format!("No certificates for tenant '{}'", request.tenant));
            return Ok(CommandResult::success());
        }

        for line in format_table(&rows, Utc::now()) {
            println!("{}", line);
        }
        Ok(CommandResult::success())
    }
}
