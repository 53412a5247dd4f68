//! Request/response headers, grounded on `async-opcua-types::request_header`
//! and `async-opcua-types::response_header`, trimmed to the fields the
//! dispatcher and services actually read or write: diagnostics masks,
//! string tables and the additional-header extension object are handled by
//! the codec collaborator, not the core.

use crate::node_id::NodeId;
use crate::status_code::StatusCode;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestHeader {
    /// The session authentication token (`sessionToken`). Not present on
    /// discovery requests, which precede any session.
    pub authentication_token: NodeId,
    pub request_handle: u32,
    pub timeout_hint: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResponseHeader {
    pub request_handle: u32,
    pub service_result: StatusCode,
}

impl ResponseHeader {
    pub fn new_good(request_header: &RequestHeader) -> Self {
        Self {
            request_handle: request_header.request_handle,
            service_result: StatusCode::Good,
        }
    }

    pub fn new_error(request_header: &RequestHeader, status: StatusCode) -> Self {
        Self {
            request_handle: request_header.request_handle,
            service_result: status,
        }
    }
}
