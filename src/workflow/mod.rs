//! Multi-step form workflows.
//!
//! A [`Workflow`] is an ordered list of [`Step`]s that share a [`Context`]
//! and end in a single [`Commit`] against the controller:
//!
//! 1. Each step checks its dependency keys are present
//! 2. The step builds its form and validates the submission
//! 3. Cleaned values are contributed to the context (write-once)
//! 4. After every step succeeded, the commit runs with the full context
//!
//! [`WorkflowRunner`] drives a run and reports a [`WorkflowResult`]; field
//! errors, missing dependencies and commit failures all come back as a
//! [`WorkflowStatus`], never as a panic or an unhandled error.

pub mod context;
pub mod definition;
pub mod request;
pub mod runner;
pub mod step;

pub use context::{Context, SENSITIVE_KEYS};
pub use definition::{Commit, Workflow, WorkflowBuilder, WorkflowMeta};
pub use request::Request;
pub use runner::{HaltReason, WorkflowResult, WorkflowRunner, WorkflowStatus};
pub use step::{Step, StepView};
