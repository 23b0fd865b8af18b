//! Certificate list tab.

use tracing::warn;

use crate::service::CertificateSummary;
use crate::workflow::Request;

/// Lists the certificates visible to the request's tenant.
#[derive(Debug, Clone, Copy, Default)]
pub struct CertificatesTab;

impl CertificatesTab {
    pub const SLUG: &'static str = "certificates";

    /// Rows for the certificate table.
    ///
    /// Never fails: if the controller cannot be reached the table is empty
    /// and a warning is sent to the user.
    pub fn table_data(&self, request: &mut Request<'_>) -> Vec<CertificateSummary> {
        match request.controller.list_certificates(&request.tenant) {
            Ok(certificates) => certificates,
            Err(err) => {
                warn!(
                    "Tab '{}' failed to list certificates for '{}': {}",
                    Self::SLUG,
                    request.tenant,
                    err
                );
                request.messages.warning("Unable to retrieve certificates");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::MessageLog;
    use crate::service::{MockController, MockOperation, ServiceError};

    #[test]
    fn lists_certificates() {
        let controller = MockController::new().with_certificates(&["a", "b"]);
        let mut log = MessageLog::new();
        let mut request = Request::new("admin", &controller, &mut log);

        let rows = CertificatesTab.table_data(&mut request);
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(log.entries().is_empty());
    }

    #[test]
    fn unavailable_controller_yields_empty_list() {
        let controller = MockController::new().unavailable(MockOperation::List);
        let mut log = MessageLog::new();
        let mut request = Request::new("admin", &controller, &mut log);

        assert!(CertificatesTab.table_data(&mut request).is_empty());
        assert_eq!(log.warnings(), vec!["Unable to retrieve certificates"]);
    }

    #[test]
    fn rejected_listing_yields_empty_list() {
        let controller = MockController::new().failing(
            MockOperation::List,
            ServiceError::Rejected {
                status: 403,
                message: "forbidden".into(),
            },
        );
        let mut log = MessageLog::new();
        let mut request = Request::new("admin", &controller, &mut log);

        assert!(CertificatesTab.table_data(&mut request).is_empty());
        assert!(log.has_warning("Unable to retrieve certificates"));
    }
}
