//! Shared display helpers for workflow results.

use tracing::debug;

use crate::messages::Messages;
use crate::workflow::{WorkflowResult, WorkflowStatus};

use super::dispatcher::CommandResult;

/// Exit code for input the workflow refused.
pub const EXIT_INVALID: i32 = 2;

/// Exit code for a commit the controller refused.
pub const EXIT_FAILED: i32 = 1;

/// Report a finished workflow run and pick the exit code.
///
/// The runner already sent the success or failure message; this adds the
/// per-field errors of an invalid run and the reason of a halted one.
pub fn report_result(messages: &mut dyn Messages, result: &WorkflowResult) -> CommandResult {
    debug!(
        "Workflow '{}' finished in {:?}",
        result.workflow, result.duration
    );
    match &result.status {
        WorkflowStatus::Completed => {
            if let Some(url) = &result.redirect {
                debug!("Continue at {}", url);
            }
            CommandResult::success()
        }
        WorkflowStatus::Invalid { errors, .. } => {
            for line in errors.messages() {
                messages.error(&line);
            }
            CommandResult::failure(EXIT_INVALID)
        }
        WorkflowStatus::Halted { step, reason } => {
            messages.error(&format!("Step '{}' could not run: {}", step, reason));
            CommandResult::failure(EXIT_INVALID)
        }
        WorkflowStatus::Failed { .. } => CommandResult::failure(EXIT_FAILED),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{FieldError, FieldErrors};
    use crate::messages::MessageLog;
    use crate::service::ServiceError;
    use crate::workflow::{Context, HaltReason};
    use std::time::Duration;

    fn result(status: WorkflowStatus) -> WorkflowResult {
        WorkflowResult {
            workflow: "addcertificate".into(),
            status,
            context: Context::new(),
            redirect: None,
            duration: Duration::ZERO,
        }
    }

    #[test]
    fn invalid_lists_each_field() {
        let mut errors = FieldErrors::new();
        errors.add("name", FieldError::Required);
        errors.add("passphrase", FieldError::Required);
        let mut log = MessageLog::new();

        let outcome = report_result(
            &mut log,
            &result(WorkflowStatus::Invalid {
                step: "addcertificateaction".into(),
                errors,
            }),
        );

        assert_eq!(outcome, CommandResult::failure(EXIT_INVALID));
        assert_eq!(log.errors().len(), 2);
        assert!(log.has_error("name: This field is required."));
    }

    #[test]
    fn halted_names_missing_key() {
        let mut log = MessageLog::new();
        let outcome = report_result(
            &mut log,
            &result(WorkflowStatus::Halted {
                step: "associatecertificateaction".into(),
                reason: HaltReason::MissingDependency {
                    key: "vip_id".into(),
                },
            }),
        );

        assert_eq!(outcome.exit_code, EXIT_INVALID);
        assert!(log.has_error("missing dependency 'vip_id'"));
    }

    #[test]
    fn failed_adds_no_second_message() {
        let mut log = MessageLog::new();
        let outcome = report_result(
            &mut log,
            &result(WorkflowStatus::Failed {
                error: ServiceError::Unavailable {
                    message: "timeout".into(),
                },
            }),
        );

        assert_eq!(outcome.exit_code, EXIT_FAILED);
        assert!(log.entries().is_empty());
    }
}
