//! Workflow execution.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::{LbError, Result};
use crate::forms::{FieldErrors, Submission};
use crate::service::ServiceError;

use super::context::Context;
use super::definition::Workflow;
use super::request::Request;
use super::step::StepView;

/// Why a run stopped before validating every step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HaltReason {
    /// A dependency key was not in the context.
    MissingDependency { key: String },
    /// A step tried to contribute a key that was already present.
    KeyConflict { key: String },
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDependency { key } => write!(f, "missing dependency '{}'", key),
            Self::KeyConflict { key } => write!(f, "context key '{}' contributed twice", key),
        }
    }
}

/// Outcome of a workflow run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowStatus {
    /// Every step validated and the commit succeeded.
    Completed,
    /// A step's input did not validate; nothing was committed.
    Invalid { step: String, errors: FieldErrors },
    /// A step could not run; nothing was committed.
    Halted { step: String, reason: HaltReason },
    /// The commit was refused by the controller.
    Failed { error: ServiceError },
}

/// Result of running a workflow.
#[derive(Debug)]
pub struct WorkflowResult {
    /// Workflow slug.
    pub workflow: String,
    pub status: WorkflowStatus,
    /// Context as it stood when the run ended.
    pub context: Context,
    /// Success destination, set only when the run completed.
    pub redirect: Option<String>,
    pub duration: Duration,
}

impl WorkflowResult {
    /// Whether the commit ran and succeeded.
    pub fn success(&self) -> bool {
        self.status == WorkflowStatus::Completed
    }

    /// Field errors of an invalid run.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match &self.status {
            WorkflowStatus::Invalid { errors, .. } => Some(errors),
            _ => None,
        }
    }
}

/// Drives one [`Workflow`] for one user action.
pub struct WorkflowRunner<'w> {
    workflow: &'w Workflow,
}

impl<'w> WorkflowRunner<'w> {
    pub fn new(workflow: &'w Workflow) -> Self {
        Self { workflow }
    }

    /// Render every step's form for display.
    ///
    /// Dependencies that no earlier step contributes must be in `seed`.
    pub fn present(&self, request: &mut Request<'_>, seed: &Context) -> Result<Vec<StepView>> {
        let mut upcoming: Vec<&str> = Vec::new();
        let mut views = Vec::with_capacity(self.workflow.steps().len());

        for step in self.workflow.steps() {
            if let Some(key) = step
                .depends_on()
                .iter()
                .find(|key| !seed.contains(key) && !upcoming.contains(key))
            {
                return Err(LbError::MissingDependency {
                    workflow: self.workflow.slug().to_string(),
                    step: step.slug().to_string(),
                    key: key.to_string(),
                });
            }

            views.push(StepView {
                slug: step.slug().to_string(),
                name: step.name().to_string(),
                help_text: step.help_text().to_string(),
                form: step.form(request, seed),
            });
            upcoming.extend(step.contributes().iter().copied());
        }

        Ok(views)
    }

    /// Validate `submission` through every step, then commit.
    ///
    /// Stops at the first step that cannot run or does not validate; the
    /// commit only runs once all steps have contributed.
    pub fn run(&self, request: &mut Request<'_>, seed: Context, submission: &Submission) -> WorkflowResult {
        let start = Instant::now();
        let meta = self.workflow.meta();
        let mut context = seed;

        let finish = |status, context, redirect: Option<String>| WorkflowResult {
            workflow: meta.slug.to_string(),
            status,
            context,
            redirect,
            duration: start.elapsed(),
        };

        for step in self.workflow.steps() {
            if let Some(key) = step.depends_on().iter().find(|key| !context.contains(key)) {
                warn!(
                    "Workflow '{}' halted: step '{}' is missing '{}'",
                    meta.slug,
                    step.slug(),
                    key
                );
                let status = WorkflowStatus::Halted {
                    step: step.slug().to_string(),
                    reason: HaltReason::MissingDependency {
                        key: key.to_string(),
                    },
                };
                return finish(status, context, None);
            }

            debug!("Validating step '{}'", step.slug());
            let form = step.form(request, &context);
            let cleaned = match step.clean(&form, submission) {
                Ok(cleaned) => cleaned,
                Err(errors) => {
                    debug!("Step '{}' invalid: {}", step.slug(), errors);
                    let status = WorkflowStatus::Invalid {
                        step: step.slug().to_string(),
                        errors,
                    };
                    return finish(status, context, None);
                }
            };

            if let Err(err) = step.contribute(&cleaned, &mut context) {
                let key = match err {
                    LbError::ContextKeyConflict { key } => key,
                    other => other.to_string(),
                };
                warn!("Workflow '{}' halted: step '{}' conflicts on '{}'", meta.slug, step.slug(), key);
                let status = WorkflowStatus::Halted {
                    step: step.slug().to_string(),
                    reason: HaltReason::KeyConflict { key },
                };
                return finish(status, context, None);
            }
        }

        debug!("Committing '{}' with {}", meta.slug, context.redacted());
        match self.workflow.commit().commit(request, &mut context) {
            Ok(()) => {
                info!("Workflow '{}' committed", meta.slug);
                request.messages.success(meta.success_message);
                finish(
                    WorkflowStatus::Completed,
                    context,
                    Some(meta.success_url.to_string()),
                )
            }
            Err(error) => {
                warn!("Workflow '{}' commit failed: {}", meta.slug, error);
                request.messages.error(meta.failure_message);
                finish(WorkflowStatus::Failed { error }, context, None)
            }
        }
    }
}
