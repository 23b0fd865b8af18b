//! Workflow definitions.

use std::collections::HashMap;

use crate::error::{LbError, Result};
use crate::service::ServiceResult;

use super::context::Context;
use super::request::Request;
use super::step::Step;

/// Display metadata for a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowMeta {
    pub slug: &'static str,
    pub name: &'static str,
    /// Label of the button that submits the workflow.
    pub finalize_button_name: &'static str,
    pub success_message: &'static str,
    pub failure_message: &'static str,
    /// Where the caller goes after a successful commit.
    pub success_url: &'static str,
}

/// The single controller call that finishes a workflow.
pub trait Commit {
    /// Apply the completed context. May add keys to `context`
    /// (e.g. the identifier of a created object).
    fn commit(&self, request: &mut Request<'_>, context: &mut Context) -> ServiceResult<()>;
}

/// An ordered sequence of steps ending in one [`Commit`].
pub struct Workflow {
    meta: WorkflowMeta,
    steps: Vec<Box<dyn Step>>,
    commit: Box<dyn Commit>,
}

impl Workflow {
    /// Start building a workflow.
    pub fn builder(meta: WorkflowMeta, commit: impl Commit + 'static) -> WorkflowBuilder {
        WorkflowBuilder {
            meta,
            steps: Vec::new(),
            commit: Box::new(commit),
        }
    }

    pub fn meta(&self) -> &WorkflowMeta {
        &self.meta
    }

    pub fn slug(&self) -> &'static str {
        self.meta.slug
    }

    pub fn steps(&self) -> &[Box<dyn Step>] {
        &self.steps
    }

    pub(crate) fn commit(&self) -> &dyn Commit {
        self.commit.as_ref()
    }
}

impl std::fmt::Debug for Workflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workflow")
            .field("meta", &self.meta)
            .field(
                "steps",
                &self.steps.iter().map(|s| s.slug()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// Builder that checks step ordering before producing a [`Workflow`].
pub struct WorkflowBuilder {
    meta: WorkflowMeta,
    steps: Vec<Box<dyn Step>>,
    commit: Box<dyn Commit>,
}

impl WorkflowBuilder {
    /// Append a step.
    pub fn step(mut self, step: impl Step + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Validate ordering and build.
    ///
    /// Fails when a step depends on a key that only the same or a later
    /// step contributes, or when two steps contribute the same key.
    /// Dependencies no step contributes are expected to be seeded by the
    /// caller and are checked at run time.
    pub fn build(self) -> Result<Workflow> {
        check_ordering(&self.steps)?;
        Ok(Workflow {
            meta: self.meta,
            steps: self.steps,
            commit: self.commit,
        })
    }
}

fn check_ordering(steps: &[Box<dyn Step>]) -> Result<()> {
    // key -> index of the step contributing it
    let mut providers: HashMap<&str, usize> = HashMap::new();
    for (index, step) in steps.iter().enumerate() {
        for key in step.contributes() {
            if providers.insert(*key, index).is_some() {
                return Err(LbError::ContextKeyConflict {
                    key: key.to_string(),
                });
            }
        }
    }

    for (index, step) in steps.iter().enumerate() {
        for key in step.depends_on() {
            if let Some(&provider) = providers.get(key) {
                if provider >= index {
                    return Err(LbError::UnsatisfiableDependency {
                        step: step.slug().to_string(),
                        key: key.to_string(),
                        provider: steps[provider].slug().to_string(),
                    });
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::Form;

    struct Probe {
        slug: &'static str,
        contributes: &'static [&'static str],
        depends_on: &'static [&'static str],
    }

    impl Step for Probe {
        fn slug(&self) -> &str {
            self.slug
        }
        fn name(&self) -> &str {
            self.slug
        }
        fn contributes(&self) -> &[&'static str] {
            self.contributes
        }
        fn depends_on(&self) -> &[&'static str] {
            self.depends_on
        }
        fn form(&self, _request: &mut Request<'_>, _context: &Context) -> Form {
            Form::from_schema(&[])
        }
    }

    struct Noop;

    impl Commit for Noop {
        fn commit(&self, _request: &mut Request<'_>, _context: &mut Context) -> ServiceResult<()> {
            Ok(())
        }
    }

    const META: WorkflowMeta = WorkflowMeta {
        slug: "probe",
        name: "Probe",
        finalize_button_name: "Go",
        success_message: "ok",
        failure_message: "not ok",
        success_url: "/",
    };

    #[test]
    fn accepts_dependencies_on_earlier_steps() {
        let workflow = Workflow::builder(META, Noop)
            .step(Probe {
                slug: "first",
                contributes: &["a"],
                depends_on: &[],
            })
            .step(Probe {
                slug: "second",
                contributes: &["b"],
                depends_on: &["a", "seeded"],
            })
            .build()
            .unwrap();
        assert_eq!(workflow.steps().len(), 2);
        assert_eq!(workflow.slug(), "probe");
    }

    #[test]
    fn rejects_dependency_on_later_step() {
        let err = Workflow::builder(META, Noop)
            .step(Probe {
                slug: "first",
                contributes: &["a"],
                depends_on: &["b"],
            })
            .step(Probe {
                slug: "second",
                contributes: &["b"],
                depends_on: &[],
            })
            .build()
            .unwrap_err();
        match err {
            LbError::UnsatisfiableDependency { step, key, provider } => {
                assert_eq!(step, "first");
                assert_eq!(key, "b");
                assert_eq!(provider, "second");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn rejects_self_dependency() {
        let err = Workflow::builder(META, Noop)
            .step(Probe {
                slug: "loop",
                contributes: &["a"],
                depends_on: &["a"],
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, LbError::UnsatisfiableDependency { .. }));
    }

    #[test]
    fn rejects_two_steps_contributing_same_key() {
        let err = Workflow::builder(META, Noop)
            .step(Probe {
                slug: "one",
                contributes: &["a"],
                depends_on: &[],
            })
            .step(Probe {
                slug: "two",
                contributes: &["a"],
                depends_on: &[],
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, LbError::ContextKeyConflict { .. }));
    }
}
