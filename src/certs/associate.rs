//! "Associate Certificates" workflow.
//!
//! The step's choices come from the controller each time the form is built:
//! an empty placeholder followed by every certificate name the tenant can
//! see. Current assignments of the pool and virtual IP are pre-selected.

use tracing::{debug, warn};

use crate::error::Result;
use crate::forms::{Choice, FieldKind, FieldSpec, Form};
use crate::service::{CertificateAssociation, ServiceResult};
use crate::workflow::{Commit, Context, Request, Step, Workflow, WorkflowMeta};

use super::{LOADBALANCERS_INDEX, SELECT_PLACEHOLDER};

/// Fields of the associate form. Choices are filled in per request.
pub const ASSOCIATE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("pool_cert", "Pool Certificate", FieldKind::Choice),
    FieldSpec::new("vip_cert", "VIP Certificate", FieldKind::Choice),
];

const META: WorkflowMeta = WorkflowMeta {
    slug: "associatecertificate",
    name: "Associate Certificates",
    finalize_button_name: "Associate",
    success_message: "Associated certificates",
    failure_message: "Unable to associate certificates",
    success_url: LOADBALANCERS_INDEX,
};

/// Picks the certificates for a pool and its virtual IP.
///
/// Needs `pool_id` and `vip_id` in the context.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssociateCertificatesStep;

impl AssociateCertificatesStep {
    fn certificate_choices(request: &mut Request<'_>) -> Vec<Choice> {
        let mut choices = vec![Choice::new("", SELECT_PLACEHOLDER)];
        match request.controller.list_certificates(&request.tenant) {
            Ok(certificates) => {
                debug!("Offering {} certificates", certificates.len());
                choices.extend(
                    certificates
                        .into_iter()
                        .map(|c| Choice::new(c.name.clone(), c.name)),
                );
            }
            Err(err) => {
                warn!("Failed to list certificates for '{}': {}", request.tenant, err);
                request.messages.warning("Unable to retrieve certificates");
            }
        }
        choices
    }
}

fn current_assignment(
    what: &str,
    id: Option<&str>,
    lookup: impl FnOnce(&str) -> ServiceResult<Option<String>>,
) -> Option<String> {
    let id = id?;
    match lookup(id) {
        Ok(name) => name.filter(|n| !n.is_empty()),
        Err(err) => {
            warn!("Failed to look up certificate of {} '{}': {}", what, id, err);
            None
        }
    }
}

impl Step for AssociateCertificatesStep {
    fn slug(&self) -> &str {
        "associatecertificateaction"
    }

    fn name(&self) -> &str {
        "Associate Certificates"
    }

    fn help_text(&self) -> &str {
        "Select the certificates served by the pool and its virtual IP."
    }

    fn contributes(&self) -> &[&'static str] {
        &["pool_cert", "vip_cert"]
    }

    fn depends_on(&self) -> &[&'static str] {
        &["pool_id", "vip_id"]
    }

    fn form(&self, request: &mut Request<'_>, context: &Context) -> Form {
        let mut form = Form::from_schema(ASSOCIATE_FIELDS);
        let choices = Self::certificate_choices(request);
        form.set_choices("pool_cert", choices.clone());
        form.set_choices("vip_cert", choices);

        let controller = request.controller;
        form.set_initial(
            "pool_cert",
            current_assignment("pool", context.get("pool_id"), |id| {
                controller.get_pool_certificate(id)
            }),
        );
        form.set_initial(
            "vip_cert",
            current_assignment("vip", context.get("vip_id"), |id| {
                controller.get_vip_certificate(id)
            }),
        );
        form
    }
}

/// Applies the chosen certificates to the pool and virtual IP.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyAssociation;

impl Commit for ApplyAssociation {
    fn commit(&self, request: &mut Request<'_>, context: &mut Context) -> ServiceResult<()> {
        let association = CertificateAssociation::from_context(context);
        debug!(
            "Associating pool '{}' -> '{}', vip '{}' -> '{}'",
            association.pool_id, association.pool_cert, association.vip_id, association.vip_cert
        );
        request.controller.associate_certificates(&association)
    }
}

/// Build the associate-certificates workflow.
pub fn associate_certificates() -> Result<Workflow> {
    Workflow::builder(META, ApplyAssociation)
        .step(AssociateCertificatesStep)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{FieldError, Submission};
    use crate::messages::MessageLog;
    use crate::service::{ControllerApi, MockController, MockOperation};
    use crate::workflow::{HaltReason, WorkflowRunner, WorkflowStatus};

    fn seed() -> Context {
        Context::seeded([("pool_id", "P"), ("vip_id", "V")]).unwrap()
    }

    #[test]
    fn form_offers_placeholder_and_names() {
        let controller = MockController::new()
            .with_certificates(&["c1", "c2"])
            .with_pool_certificate("P", "c1")
            .with_vip_certificate("V", "c2");
        let mut log = MessageLog::new();
        let mut request = Request::new("admin", &controller, &mut log);

        let form = AssociateCertificatesStep.form(&mut request, &seed());

        let pool = form.field("pool_cert").unwrap();
        let values: Vec<_> = pool.choices.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["", "c1", "c2"]);
        assert_eq!(pool.choices[0].label, SELECT_PLACEHOLDER);
        assert_eq!(pool.initial.as_deref(), Some("c1"));
        assert_eq!(form.field("vip_cert").unwrap().initial.as_deref(), Some("c2"));
    }

    #[test]
    fn unassigned_lookup_leaves_no_default() {
        let controller = MockController::new().with_certificates(&["c1"]);
        let mut log = MessageLog::new();
        let mut request = Request::new("admin", &controller, &mut log);

        let form = AssociateCertificatesStep.form(&mut request, &seed());
        assert!(form.field("pool_cert").unwrap().initial.is_none());
        assert!(form.field("vip_cert").unwrap().initial.is_none());
    }

    #[test]
    fn list_failure_degrades_to_placeholder_only() {
        let controller = MockController::new().unavailable(MockOperation::List);
        let mut log = MessageLog::new();
        let mut request = Request::new("admin", &controller, &mut log);

        let form = AssociateCertificatesStep.form(&mut request, &seed());

        assert_eq!(form.field("pool_cert").unwrap().choices.len(), 1);
        assert!(log.has_warning("Unable to retrieve certificates"));
    }

    #[test]
    fn lookup_failure_leaves_no_default() {
        let controller = MockController::new()
            .with_certificates(&["c1"])
            .with_pool_certificate("P", "c1")
            .unavailable(MockOperation::Lookup);
        let mut log = MessageLog::new();
        let mut request = Request::new("admin", &controller, &mut log);

        let form = AssociateCertificatesStep.form(&mut request, &seed());
        assert!(form.field("pool_cert").unwrap().initial.is_none());
        assert!(log.warnings().is_empty());
    }

    #[test]
    fn unknown_certificate_is_rejected() {
        let workflow = associate_certificates().unwrap();
        let controller = MockController::new().with_certificates(&["c1"]);
        let mut log = MessageLog::new();
        let mut request = Request::new("admin", &controller, &mut log);

        let submission = Submission::new()
            .with_value("pool_cert", "c1")
            .with_value("vip_cert", "nope");
        let result = WorkflowRunner::new(&workflow).run(&mut request, seed(), &submission);

        assert_eq!(
            result.field_errors().unwrap().get("vip_cert"),
            &[FieldError::InvalidChoice {
                value: "nope".into()
            }]
        );
        assert_eq!(controller.call_count("associate_certificates"), 0);
    }

    #[test]
    fn commits_chosen_names() {
        let workflow = associate_certificates().unwrap();
        let controller = MockController::new().with_certificates(&["c1", "c2"]);
        let mut log = MessageLog::new();
        let mut request = Request::new("admin", &controller, &mut log);

        let submission = Submission::new()
            .with_value("pool_cert", "c2")
            .with_value("vip_cert", "c1");
        let result = WorkflowRunner::new(&workflow).run(&mut request, seed(), &submission);

        assert!(result.success());
        assert_eq!(
            controller.associations(),
            vec![CertificateAssociation {
                pool_id: "P".into(),
                vip_id: "V".into(),
                pool_cert: "c2".into(),
                vip_cert: "c1".into(),
            }]
        );
        assert_eq!(controller.get_pool_certificate("P").unwrap().as_deref(), Some("c2"));
        assert!(log.has_success("Associated certificates"));
    }

    #[test]
    fn missing_vip_halts() {
        let workflow = associate_certificates().unwrap();
        let controller = MockController::new().with_certificates(&["c1"]);
        let mut log = MessageLog::new();
        let mut request = Request::new("admin", &controller, &mut log);

        let submission = Submission::new()
            .with_value("pool_cert", "c1")
            .with_value("vip_cert", "c1");
        let seed = Context::seeded([("pool_id", "P")]).unwrap();
        let result = WorkflowRunner::new(&workflow).run(&mut request, seed, &submission);

        assert_eq!(
            result.status,
            WorkflowStatus::Halted {
                step: "associatecertificateaction".into(),
                reason: HaltReason::MissingDependency {
                    key: "vip_id".into()
                },
            }
        );
        assert_eq!(controller.call_count("list_certificates"), 0);
        assert_eq!(controller.call_count("associate_certificates"), 0);
    }
}
