//! "Add Certificate" workflow.

use tracing::{debug, warn};

use crate::error::Result;
use crate::forms::{CleanedData, FieldErrors, FieldKind, FieldSpec, Form, Submission};
use crate::service::{NewCertificate, ServiceResult};
use crate::workflow::{Commit, Context, Request, Step, Workflow, WorkflowMeta};

use super::LOADBALANCERS_INDEX;

const SOURCE_CHOICES: &[(&str, &str)] = &[
    ("", "Select Key Source"),
    ("raw", "Direct Input"),
    ("file", "File"),
];

/// Fields of the add-certificate form.
///
/// `key_source` / `cert_source` only switch which input the page shows; an
/// uploaded file always wins over the inline text.
pub const ADD_CERTIFICATE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", "Name", FieldKind::Text).max_length(255),
    FieldSpec::new("key_source", "Key Source", FieldKind::Choice)
        .choices(SOURCE_CHOICES)
        .optional(),
    FieldSpec::new("key_upload", "Key File", FieldKind::File).optional(),
    FieldSpec::new("key_data", "Key Data", FieldKind::Textarea).optional(),
    FieldSpec::new("passphrase", "Key Passphrase", FieldKind::Password).max_length(255),
    FieldSpec::new("cert_source", "Cert Source", FieldKind::Choice)
        .choices(SOURCE_CHOICES)
        .optional(),
    FieldSpec::new("cert_upload", "Cert File", FieldKind::File).optional(),
    FieldSpec::new("cert_data", "Cert Data", FieldKind::Textarea).optional(),
];

const META: WorkflowMeta = WorkflowMeta {
    slug: "addcertificate",
    name: "Add Certificate",
    finalize_button_name: "Add",
    success_message: "Added certificate",
    failure_message: "Unable to add certificate",
    success_url: LOADBALANCERS_INDEX,
};

/// Collects the certificate name, key, certificate and passphrase.
#[derive(Debug, Clone)]
pub struct AddCertificateStep {
    upload_limit: usize,
}

impl AddCertificateStep {
    pub fn new(upload_limit: usize) -> Self {
        Self { upload_limit }
    }
}

impl Step for AddCertificateStep {
    fn slug(&self) -> &str {
        "addcertificateaction"
    }

    fn name(&self) -> &str {
        "Add New Certificate"
    }

    fn help_text(&self) -> &str {
        "Upload a Certificate.\n\nSpecify key and certificate files to upload"
    }

    fn contributes(&self) -> &[&'static str] {
        &["name", "key_data", "passphrase", "cert_data"]
    }

    fn form(&self, _request: &mut Request<'_>, _context: &Context) -> Form {
        Form::from_schema(ADD_CERTIFICATE_FIELDS).with_upload_limit(self.upload_limit)
    }

    fn clean(&self, form: &Form, submission: &Submission) -> std::result::Result<CleanedData, FieldErrors> {
        let mut cleaned = form.clean(submission)?;
        for prefix in ["key", "cert"] {
            if let Some(text) = cleaned.remove(&format!("{}_upload", prefix)) {
                debug!("Using uploaded {} ({} bytes)", prefix, text.len());
                cleaned.insert(format!("{}_data", prefix), text);
            }
        }
        Ok(cleaned)
    }
}

/// Uploads the certificate and records its identifier as `certificate_id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateCertificate;

impl Commit for CreateCertificate {
    fn commit(&self, request: &mut Request<'_>, context: &mut Context) -> ServiceResult<()> {
        let certificate = NewCertificate::from_context(context);
        let created = request.controller.create_certificate(&certificate)?;
        if let Err(err) = context.contribute("certificate_id", created.id) {
            warn!("Certificate '{}' created but not recorded: {}", created.name, err);
        }
        Ok(())
    }
}

/// Build the add-certificate workflow with the given upload limit.
pub fn add_certificate(upload_limit: usize) -> Result<Workflow> {
    Workflow::builder(META, CreateCertificate)
        .step(AddCertificateStep::new(upload_limit))
        .build()
}
