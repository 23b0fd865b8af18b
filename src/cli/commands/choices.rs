//! Choices command implementation.
//!
//! The `lbcerts choices` command shows the associate dialog without
//! submitting it: every certificate on offer, with the current one marked.

use anyhow::Context as _;
use console::Style;

use crate::certs::associate_certificates;
use crate::cli::args::ChoicesArgs;
use crate::error::Result;
use crate::forms::Field;
use crate::workflow::{Context, Request, WorkflowRunner};

use super::dispatcher::{Command, CommandResult};

/// The choices command implementation.
pub struct ChoicesCommand {
    args: ChoicesArgs,
}

impl ChoicesCommand {
    /// Create a new choices command.
    pub fn new(args: ChoicesArgs) -> Self {
        Self { args }
    }
}

/// Lines for one choice field; the preselected entry is starred.
pub fn format_field(field: &Field) -> Vec<String> {
    let mut lines = vec![format!("{}:", Style::new().bold().apply_to(field.label))];
    for choice in field.choices.iter().filter(|c| !c.value.is_empty()) {
        let marker = if field.initial.as_deref() == Some(choice.value.as_str()) {
            "*"
        } else {
            " "
        };
        lines.push(format!("  {} {}", marker, choice.label));
    }
    lines
}

impl Command for ChoicesCommand {
    fn execute(&self, request: &mut Request<'_>) -> Result<CommandResult> {
        let workflow = associate_certificates()?;
        let seed = Context::seeded([
            ("pool_id", self.args.pool.as_str()),
            ("vip_id", self.args.vip.as_str()),
        ])?;
        let views = WorkflowRunner::new(&workflow).present(request, &seed)?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&views).context("Failed to encode choices")?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        for view in &views {
            for field in view.form.fields() {
                for line in format_field(field) {
                    println!("{}", line);
                }
            }
        }
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{Choice, FieldKind, FieldSpec, Form};
    use crate::messages::MessageLog;
    use crate::service::MockController;

    const SCHEMA: &[FieldSpec] = &[FieldSpec::new("pool_cert", "Pool Certificate", FieldKind::Choice)];

    #[test]
    fn marks_initial_and_hides_placeholder() {
        let mut form = Form::from_schema(SCHEMA);
        form.set_choices(
            "pool_cert",
            vec![
                Choice::new("", "Select a Certificate"),
                Choice::new("c1", "c1"),
                Choice::new("c2", "c2"),
            ],
        );
        form.set_initial("pool_cert", Some("c2".into()));

        let lines = format_field(form.field("pool_cert").unwrap());
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "    c1");
        assert_eq!(lines[2], "  * c2");
    }

    #[test]
    fn execute_presents_without_committing() {
        let controller = MockController::new()
            .with_certificates(&["c1"])
            .with_pool_certificate("P", "c1");
        let mut log = MessageLog::new();
        let mut request = Request::new("admin", &controller, &mut log);

        let args = ChoicesArgs {
            pool: "P".into(),
            vip: "V".into(),
            json: true,
        };
        let result = ChoicesCommand::new(args).execute(&mut request).unwrap();

        assert!(result.success);
        assert_eq!(controller.call_count("associate_certificates"), 0);
        assert_eq!(controller.call_count("get_pool_certificate"), 1);
    }
}
