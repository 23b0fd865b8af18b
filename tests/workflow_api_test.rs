//! End-to-end tests of the certificate workflows through the public API.

use lbcerts::certs::{add_certificate, associate_certificates};
use lbcerts::forms::{FieldError, PayloadError, Submission, UploadedFile, DEFAULT_MAX_UPLOAD};
use lbcerts::messages::MessageLog;
use lbcerts::service::{MockController, MockOperation, ServiceError};
use lbcerts::tabs::CertificatesTab;
use lbcerts::workflow::{Context, HaltReason, Request, WorkflowRunner, WorkflowStatus};

fn cert1_submission() -> Submission {
    Submission::new()
        .with_value("name", "cert1")
        .with_value("key_source", "raw")
        .with_value("key_data", "KEY")
        .with_value("cert_source", "raw")
        .with_value("cert_data", "CERT")
        .with_value("passphrase", "pw")
}

#[test]
fn add_certificate_success_records_id() {
    let workflow = add_certificate(DEFAULT_MAX_UPLOAD).unwrap();
    let controller = MockController::new();
    let mut log = MessageLog::new();
    let mut request = Request::new("admin", &controller, &mut log);

    let result = WorkflowRunner::new(&workflow).run(&mut request, Context::new(), &cert1_submission());

    assert!(result.success());
    assert!(result.context.contains("certificate_id"));
    assert_eq!(result.redirect.as_deref(), Some("/project/loadbalancers/"));
    assert_eq!(log.successes(), vec!["Added certificate"]);
}

#[test]
fn add_certificate_commit_failure_has_no_id() {
    let workflow = add_certificate(DEFAULT_MAX_UPLOAD).unwrap();
    let controller = MockController::new().failing(
        MockOperation::Create,
        ServiceError::Rejected {
            status: 400,
            message: "Invalid key".into(),
        },
    );
    let mut log = MessageLog::new();
    let mut request = Request::new("admin", &controller, &mut log);

    let result = WorkflowRunner::new(&workflow).run(&mut request, Context::new(), &cert1_submission());

    assert!(!result.success());
    assert!(!result.context.contains("certificate_id"));
    assert_eq!(log.errors(), vec!["Unable to add certificate"]);
}

#[test]
fn unreachable_controller_fails_commit() {
    let workflow = add_certificate(DEFAULT_MAX_UPLOAD).unwrap();
    let controller = MockController::new().unavailable(MockOperation::Create);
    let mut log = MessageLog::new();
    let mut request = Request::new("admin", &controller, &mut log);

    let result = WorkflowRunner::new(&workflow).run(&mut request, Context::new(), &cert1_submission());

    match result.status {
        WorkflowStatus::Failed { error } => assert!(error.is_unavailable()),
        other => panic!("unexpected status {:?}", other),
    }
}

#[test]
fn oversized_key_upload_never_reaches_controller() {
    let workflow = add_certificate(DEFAULT_MAX_UPLOAD).unwrap();
    let controller = MockController::new();
    let mut log = MessageLog::new();
    let mut request = Request::new("admin", &controller, &mut log);

    let submission = cert1_submission().with_file(
        "key_upload",
        UploadedFile::new("big.pem", vec![b'A'; DEFAULT_MAX_UPLOAD + 1]),
    );
    let result = WorkflowRunner::new(&workflow).run(&mut request, Context::new(), &submission);

    let errors = result.field_errors().expect("field errors");
    assert!(matches!(
        errors.get("key_upload"),
        [FieldError::Payload {
            error: PayloadError::TooLarge { .. },
            ..
        }]
    ));
    assert_eq!(
        errors.get("key_upload")[0].to_string(),
        "File exceeds maximum size (16kb)"
    );
    assert_eq!(controller.call_count("create_certificate"), 0);
    assert!(log.entries().is_empty());
}

#[test]
fn upload_at_limit_is_accepted() {
    let workflow = add_certificate(DEFAULT_MAX_UPLOAD).unwrap();
    let controller = MockController::new();
    let mut log = MessageLog::new();
    let mut request = Request::new("admin", &controller, &mut log);

    let submission = cert1_submission().with_file(
        "cert_upload",
        UploadedFile::new("exact.pem", vec![b'C'; DEFAULT_MAX_UPLOAD]),
    );
    let result = WorkflowRunner::new(&workflow).run(&mut request, Context::new(), &submission);

    assert!(result.success());
    assert_eq!(controller.created()[0].cert_data.len(), DEFAULT_MAX_UPLOAD);
}

#[test]
fn associate_presents_choices_with_defaults() {
    let workflow = associate_certificates().unwrap();
    let controller = MockController::new()
        .with_certificates(&["c1", "c2"])
        .with_pool_certificate("P", "c1")
        .with_vip_certificate("V", "c2");
    let mut log = MessageLog::new();
    let mut request = Request::new("admin", &controller, &mut log);
    let seed = Context::seeded([("pool_id", "P"), ("vip_id", "V")]).unwrap();

    let views = WorkflowRunner::new(&workflow)
        .present(&mut request, &seed)
        .unwrap();
    let form = &views[0].form;

    for name in ["pool_cert", "vip_cert"] {
        let field = form.field(name).unwrap();
        assert!(field.offers("c1"));
        assert!(field.offers("c2"));
    }
    assert_eq!(form.field("pool_cert").unwrap().initial.as_deref(), Some("c1"));
    assert_eq!(form.field("vip_cert").unwrap().initial.as_deref(), Some("c2"));
}

#[test]
fn associate_without_vip_halts_before_commit() {
    let workflow = associate_certificates().unwrap();
    let controller = MockController::new().with_certificates(&["c1"]);
    let mut log = MessageLog::new();
    let mut request = Request::new("admin", &controller, &mut log);

    let submission = Submission::new()
        .with_value("pool_cert", "c1")
        .with_value("vip_cert", "c1");
    let result = WorkflowRunner::new(&workflow).run(
        &mut request,
        Context::seeded([("pool_id", "P")]).unwrap(),
        &submission,
    );

    assert!(matches!(
        result.status,
        WorkflowStatus::Halted {
            reason: HaltReason::MissingDependency { ref key },
            ..
        } if key == "vip_id"
    ));
    assert_eq!(controller.call_count("associate_certificates"), 0);
}

#[test]
fn associate_commit_failure_reports_once() {
    let workflow = associate_certificates().unwrap();
    let controller = MockController::new()
        .with_certificates(&["c1"])
        .unavailable(MockOperation::Associate);
    let mut log = MessageLog::new();
    let mut request = Request::new("admin", &controller, &mut log);

    let submission = Submission::new()
        .with_value("pool_cert", "c1")
        .with_value("vip_cert", "c1");
    let seed = Context::seeded([("pool_id", "P"), ("vip_id", "V")]).unwrap();
    let result = WorkflowRunner::new(&workflow).run(&mut request, seed, &submission);

    assert!(!result.success());
    assert_eq!(log.errors(), vec!["Unable to associate certificates"]);
    assert!(log.successes().is_empty());
}

#[test]
fn list_failure_yields_empty_table() {
    let controller = MockController::new().unavailable(MockOperation::List);
    let mut log = MessageLog::new();
    let mut request = Request::new("admin", &controller, &mut log);

    assert!(CertificatesTab.table_data(&mut request).is_empty());
    assert!(log.has_warning("Unable to retrieve certificates"));
}

#[test]
fn context_never_leaks_secrets_in_debug_output() {
    let workflow = add_certificate(DEFAULT_MAX_UPLOAD).unwrap();
    let controller = MockController::new();
    let mut log = MessageLog::new();
    let mut request = Request::new("admin", &controller, &mut log);

    let submission = cert1_submission().with_value("passphrase", "hunter2");
    let result = WorkflowRunner::new(&workflow).run(&mut request, Context::new(), &submission);

    let shown = format!("{:?}", result.context);
    assert!(shown.contains("cert1"));
    assert!(!shown.contains("hunter2"));
    assert!(!shown.contains("KEY"));
}
