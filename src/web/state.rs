//! # Web API Application State

use std::time::Duration;

use crate::execution::OperationContext;
use crate::service::HttpCheckService;

/// Shared application state for the web API
#[derive(Clone, Debug)]
pub struct AppState {
    pub service: HttpCheckService,

    /// Deadline applied to each request's store calls
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(service: HttpCheckService, request_timeout: Duration) -> Self {
        Self {
            service,
            request_timeout,
        }
    }

    /// Fresh deadline for one inbound request.
    pub fn operation_context(&self) -> OperationContext {
        OperationContext::with_timeout(self.request_timeout)
    }
}
