//! Per-action request state.

use crate::messages::Messages;
use crate::service::ControllerApi;

/// Everything a step, commit or tab needs from the current user action:
/// the caller's tenant, the controller client, and where to send messages.
pub struct Request<'a> {
    pub tenant: String,
    pub controller: &'a dyn ControllerApi,
    pub messages: &'a mut dyn Messages,
}

impl<'a> Request<'a> {
    pub fn new(
        tenant: impl Into<String>,
        controller: &'a dyn ControllerApi,
        messages: &'a mut dyn Messages,
    ) -> Self {
        Self {
            tenant: tenant.into(),
            controller,
            messages,
        }
    }
}
