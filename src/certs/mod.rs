//! Certificate workflows for load balancer pools and virtual IPs.
//!
//! - [`add_certificate`] - upload a key and certificate (inline or as files)
//! - [`associate_certificates`] - attach existing certificates to a pool
//!   and its virtual IP
//!
//! # Example
//!
//! ```
//! use lbcerts::certs::add_certificate;
//! use lbcerts::forms::{Submission, DEFAULT_MAX_UPLOAD};
//! use lbcerts::messages::MessageLog;
//! use lbcerts::service::MockController;
//! use lbcerts::workflow::{Context, Request, WorkflowRunner};
//!
//! let workflow = add_certificate(DEFAULT_MAX_UPLOAD).unwrap();
//! let controller = MockController::new();
//! let mut messages = MessageLog::new();
//! let mut request = Request::new("admin", &controller, &mut messages);
//!
//! let submission = Submission::new()
//!     .with_value("name", "web")
//!     .with_value("key_data", "KEY")
//!     .with_value("cert_data", "CERT")
//!     .with_value("passphrase", "pw");
//!
//! let result = WorkflowRunner::new(&workflow).run(&mut request, Context::new(), &submission);
//! assert!(result.success());
//! assert!(result.context.contains("certificate_id"));
//! ```

pub mod add;
pub mod associate;

pub use add::{add_certificate, AddCertificateStep, CreateCertificate, ADD_CERTIFICATE_FIELDS};
pub use associate::{
    associate_certificates, ApplyAssociation, AssociateCertificatesStep, ASSOCIATE_FIELDS,
};

/// Where both workflows send the caller after a successful commit.
pub const LOADBALANCERS_INDEX: &str = "/project/loadbalancers/";

/// Label of the empty entry at the top of every certificate choice list.
pub const SELECT_PLACEHOLDER: &str = "Select a Certificate";
