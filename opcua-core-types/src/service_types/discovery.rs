//! FindServers, grounded on
//! `async-opcua-types::generated::types::application_description` and
//! `find_servers_request`/`find_servers_response`.

use crate::headers::{RequestHeader, ResponseHeader};
use crate::qualified_name::LocalizedText;

#[derive(Debug, Clone, Default)]
pub struct FindServersRequest {
    pub request_header: RequestHeader,
    pub endpoint_url: String,
    pub locale_ids: Vec<String>,
    pub server_uris: Vec<String>,
}

/// Part 4 §5.4.2.1. Only the fields this core populates are kept; the
/// remaining `ApplicationDescription` fields (product URI, gateway server
/// URI, discovery profile URI) are the endpoint-config collaborator's
/// concern and not modeled here.
#[derive(Debug, Clone, Default)]
pub struct ApplicationDescription {
    pub application_uri: String,
    pub application_name: LocalizedText,
    pub discovery_urls: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FindServersResponse {
    pub response_header: ResponseHeader,
    pub servers: Vec<ApplicationDescription>,
}
