//! In-memory controller for testing.
//!
//! `MockController` implements [`ControllerApi`] against in-memory state,
//! records every call, and can be told to fail individual operations.
//!
//! # Example
//!
//! ```
//! use lbcerts::service::{ControllerApi, MockController};
//!
//! let controller = MockController::new()
//!     .with_certificates(&["c1", "c2"])
//!     .with_pool_certificate("P", "c1");
//!
//! let names: Vec<_> = controller
//!     .list_certificates("admin")
//!     .unwrap()
//!     .into_iter()
//!     .map(|c| c.name)
//!     .collect();
//! assert_eq!(names, vec!["c1", "c2"]);
//! assert_eq!(controller.get_pool_certificate("P").unwrap(), Some("c1".to_string()));
//! assert_eq!(controller.call_count("list_certificates"), 1);
//! ```

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{
    CertificateAssociation, CertificateSummary, ControllerApi, NewCertificate, ServiceError,
    ServiceResult, SessionInfo,
};

/// Operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    List,
    Create,
    Associate,
    Lookup,
    Session,
}

#[derive(Debug, Default)]
struct MockState {
    certificates: Vec<CertificateSummary>,
    pool_certs: HashMap<String, String>,
    vip_certs: HashMap<String, String>,
    failures: HashMap<MockOperation, ServiceError>,
    created: Vec<NewCertificate>,
    associations: Vec<CertificateAssociation>,
    calls: Vec<String>,
    next_id: usize,
}

/// In-memory controller implementation for testing.
#[derive(Debug, Default)]
pub struct MockController {
    state: Mutex<MockState>,
}

impl MockController {
    /// Create an empty controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed certificates by name.
    pub fn with_certificates(self, names: &[&str]) -> Self {
        {
            let mut state = self.state();
            for name in names {
                state.next_id += 1;
                let id = format!("cert-{}", state.next_id);
                state.certificates.push(CertificateSummary::new(id, *name));
            }
        }
        self
    }

    /// Attach a certificate to a pool.
    pub fn with_pool_certificate(self, pool_id: &str, name: &str) -> Self {
        self.state()
            .pool_certs
            .insert(pool_id.to_string(), name.to_string());
        self
    }

    /// Attach a certificate to a virtual IP.
    pub fn with_vip_certificate(self, vip_id: &str, name: &str) -> Self {
        self.state()
            .vip_certs
            .insert(vip_id.to_string(), name.to_string());
        self
    }

    /// Make `operation` fail with `error` from now on.
    pub fn failing(self, operation: MockOperation, error: ServiceError) -> Self {
        self.state().failures.insert(operation, error);
        self
    }

    /// Make `operation` fail as if the controller were unreachable.
    pub fn unavailable(self, operation: MockOperation) -> Self {
        self.failing(
            operation,
            ServiceError::Unavailable {
                message: "connection refused".to_string(),
            },
        )
    }

    /// Certificates uploaded through `create_certificate`.
    pub fn created(&self) -> Vec<NewCertificate> {
        self.state().created.clone()
    }

    /// Associations applied through `associate_certificates`.
    pub fn associations(&self) -> Vec<CertificateAssociation> {
        self.state().associations.clone()
    }

    /// Names of all calls made, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    /// Number of calls made to `operation`.
    pub fn call_count(&self, operation: &str) -> usize {
        self.state().calls.iter().filter(|c| *c == operation).count()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn enter(&self, call: &str, operation: MockOperation) -> ServiceResult<MutexGuard<'_, MockState>> {
        let mut state = self.state();
        state.calls.push(call.to_string());
        if let Some(err) = state.failures.get(&operation).cloned() {
            return Err(err);
        }
        Ok(state)
    }
}

impl ControllerApi for MockController {
    fn list_certificates(&self, _tenant: &str) -> ServiceResult<Vec<CertificateSummary>> {
        let state = self.enter("list_certificates", MockOperation::List)?;
        Ok(state.certificates.clone())
    }

    fn create_certificate(&self, certificate: &NewCertificate) -> ServiceResult<CertificateSummary> {
        let mut state = self.enter("create_certificate", MockOperation::Create)?;
        if state.certificates.iter().any(|c| c.name == certificate.name) {
            return Err(ServiceError::Rejected {
                status: 409,
                message: format!("Certificate '{}' already exists", certificate.name),
            });
        }
        state.next_id += 1;
        let summary = CertificateSummary::new(format!("cert-{}", state.next_id), &certificate.name);
        state.certificates.push(summary.clone());
        state.created.push(certificate.clone());
        Ok(summary)
    }

    fn associate_certificates(&self, association: &CertificateAssociation) -> ServiceResult<()> {
        let mut state = self.enter("associate_certificates", MockOperation::Associate)?;
        state
            .pool_certs
            .insert(association.pool_id.clone(), association.pool_cert.clone());
        state
            .vip_certs
            .insert(association.vip_id.clone(), association.vip_cert.clone());
        state.associations.push(association.clone());
        Ok(())
    }

    fn get_pool_certificate(&self, pool_id: &str) -> ServiceResult<Option<String>> {
        let state = self.enter("get_pool_certificate", MockOperation::Lookup)?;
        Ok(state.pool_certs.get(pool_id).cloned())
    }

    fn get_vip_certificate(&self, vip_id: &str) -> ServiceResult<Option<String>> {
        let state = self.enter("get_vip_certificate", MockOperation::Lookup)?;
        Ok(state.vip_certs.get(vip_id).cloned())
    }

    fn session_info(&self) -> ServiceResult<SessionInfo> {
        let _state = self.enter("session_info", MockOperation::Session)?;
        Ok(SessionInfo {
            controller_address: "https://controller.invalid".to_string(),
            anti_forgery_token: "mock-csrf".to_string(),
            session_id: "mock-session".to_string(),
            tenant: "admin".to_string(),
        })
    }
}
