//! Workflow steps.

use crate::error::Result;
use crate::forms::{CleanedData, FieldErrors, Form, Submission};

use super::context::Context;
use super::request::Request;

/// A unit of input validation inside a workflow.
///
/// A step declares the context keys it [contributes](Step::contributes)
/// and the keys it [depends on](Step::depends_on). The runner refuses to
/// run a step whose dependencies are not in the context yet.
pub trait Step {
    /// Stable identifier.
    fn slug(&self) -> &str;

    /// Display name.
    fn name(&self) -> &str;

    /// Help shown next to the form.
    fn help_text(&self) -> &str {
        ""
    }

    /// Keys this step adds to the context.
    fn contributes(&self) -> &[&'static str];

    /// Keys that must be in the context before this step runs.
    fn depends_on(&self) -> &[&'static str] {
        &[]
    }

    /// Build the form for this step, including any choices fetched from
    /// the controller.
    fn form(&self, request: &mut Request<'_>, context: &Context) -> Form;

    /// Validate a submission against the form.
    fn clean(&self, form: &Form, submission: &Submission) -> std::result::Result<CleanedData, FieldErrors> {
        form.clean(submission)
    }

    /// Copy cleaned values into the context.
    ///
    /// Every contributed key is added; a key missing from `cleaned` is
    /// added as an empty string.
    fn contribute(&self, cleaned: &CleanedData, context: &mut Context) -> Result<()> {
        for key in self.contributes() {
            context.contribute(*key, cleaned.get(*key).cloned().unwrap_or_default())?;
        }
        Ok(())
    }
}

/// A step rendered for display.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StepView {
    pub slug: String,
    pub name: String,
    pub help_text: String,
    pub form: Form,
}
