//! DeleteSubscriptions. The subscription engine itself is out of scope;
//! only the request shape needed to route and acknowledge the deletion is
//! modeled here, grounded on
//! `async-opcua-types::generated::types::delete_subscriptions_request`.

use crate::headers::{RequestHeader, ResponseHeader};
use crate::status_code::StatusCode;

#[derive(Debug, Clone, Default)]
pub struct DeleteSubscriptionsRequest {
    pub request_header: RequestHeader,
    pub subscription_ids: Vec<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct DeleteSubscriptionsResponse {
    pub response_header: ResponseHeader,
    pub results: Vec<StatusCode>,
}
