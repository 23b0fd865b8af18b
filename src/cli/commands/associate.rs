//! Associate command implementation.
//!
//! `lbcerts associate --pool P --vip V` re-applies whatever is currently
//! selected, like submitting the dialog untouched; `--pool-cert` and
//! `--vip-cert` change the selection.

use crate::certs::associate_certificates;
use crate::cli::args::AssociateArgs;
use crate::error::Result;
use crate::forms::Submission;
use crate::workflow::{Context, Request, WorkflowRunner};

use super::dispatcher::{Command, CommandResult};
use super::display::report_result;

/// The associate command implementation.
pub struct AssociateCommand {
    args: AssociateArgs,
}

impl AssociateCommand {
    /// Create a new associate command.
    pub fn new(args: AssociateArgs) -> Self {
        Self { args }
    }

    fn seed(&self) -> Result<Context> {
        Context::seeded([
            ("pool_id", self.args.pool.as_str()),
            ("vip_id", self.args.vip.as_str()),
        ])
    }
}

impl Command for AssociateCommand {
    fn execute(&self, request: &mut Request<'_>) -> Result<CommandResult> {
        let workflow = associate_certificates()?;
        let runner = WorkflowRunner::new(&workflow);
        let seed = self.seed()?;

        let mut submission = Submission::new();
        if self.args.pool_cert.is_none() || self.args.vip_cert.is_none() {
            for view in runner.present(request, &seed)? {
                for field in view.form.fields() {
                    if let Some(initial) = &field.initial {
                        submission.insert_value(field.name, initial);
                    }
                }
            }
        }
        if let Some(name) = &self.args.pool_cert {
            submission.insert_value("pool_cert", name);
        }
        if let Some(name) = &self.args.vip_cert {
            submission.insert_value("vip_cert", name);
        }

        let result = runner.run(request, seed, &submission);
        Ok(report_result(request.messages, &result))
    }
}
