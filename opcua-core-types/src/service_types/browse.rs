//! Browse / BrowseNext service messages, grounded on
//! `async-opcua-types::generated::types::browse_description` and
//! `browse_request`/`browse_response`.

use crate::headers::{RequestHeader, ResponseHeader};
use crate::node_id::NodeId;
use crate::reference::{BrowseDirection, ReferenceDescription};
use crate::status_code::StatusCode;

#[derive(Debug, Clone)]
pub struct BrowseDescription {
    pub node_id: NodeId,
    pub browse_direction: BrowseDirection,
    pub reference_type_id: Option<NodeId>,
    pub include_subtypes: bool,
    /// 0 means no client-imposed limit.
    pub max_target_references: u32,
}

#[derive(Debug, Clone, Default)]
pub struct BrowseResult {
    pub status: StatusCode,
    pub continuation_point: Option<ContinuationPointHandle>,
    pub references: Vec<ReferenceDescription>,
}

#[derive(Debug, Clone, Default)]
pub struct BrowseRequest {
    pub request_header: RequestHeader,
    pub nodes_to_browse: Vec<BrowseDescription>,
}

impl Default for BrowseDescription {
    fn default() -> Self {
        Self {
            node_id: NodeId::default(),
            browse_direction: BrowseDirection::Both,
            reference_type_id: None,
            include_subtypes: true,
            max_target_references: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BrowseResponse {
    pub response_header: ResponseHeader,
    pub results: Vec<BrowseResult>,
}

#[derive(Debug, Clone, Default)]
pub struct BrowseNextRequest {
    pub request_header: RequestHeader,
    pub release_continuation_points: bool,
    pub continuation_points: Vec<ContinuationPointHandle>,
}

#[derive(Debug, Clone, Default)]
pub struct BrowseNextResponse {
    pub response_header: ResponseHeader,
    pub results: Vec<BrowseResult>,
}

/// Opaque token handed back to a client so it may resume a paginated
/// Browse. Deliberately unguessable so one client cannot page through
/// another session's continuation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContinuationPointHandle(pub u64);
