//! RegisterNodes/UnregisterNodes, grounded on
//! `async-opcua-types::generated::types::register_nodes_request`.

use crate::headers::{RequestHeader, ResponseHeader};
use crate::node_id::NodeId;

#[derive(Debug, Clone, Default)]
pub struct RegisterNodesRequest {
    pub request_header: RequestHeader,
    pub nodes_to_register: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct RegisterNodesResponse {
    pub response_header: ResponseHeader,
    pub registered_node_ids: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct UnregisterNodesRequest {
    pub request_header: RequestHeader,
    pub nodes_to_unregister: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct UnregisterNodesResponse {
    pub response_header: ResponseHeader,
}
