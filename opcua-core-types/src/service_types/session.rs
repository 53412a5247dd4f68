//! CreateSession/ActivateSession/CloseSession, grounded on
//! `async-opcua-types::generated::types::create_session_request` and
//! `async-opcua-server::session::manager`. Signature/nonce fields are kept
//! as opaque byte vectors since the crypto primitives behind them are an
//! external collaborator.

use crate::headers::{RequestHeader, ResponseHeader};
use crate::identity::IdentityToken;
use crate::node_id::NodeId;

#[derive(Debug, Clone, Default)]
pub struct CreateSessionRequest {
    pub request_header: RequestHeader,
    pub endpoint_url: String,
    pub session_name: String,
    pub client_nonce: Vec<u8>,
    pub requested_session_timeout: f64,
}

#[derive(Debug, Clone, Default)]
pub struct CreateSessionResponse {
    pub response_header: ResponseHeader,
    pub session_id: NodeId,
    pub authentication_token: NodeId,
    pub revised_session_timeout: f64,
    pub server_nonce: Vec<u8>,
    pub server_endpoints: Vec<String>,
    pub server_signature: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ActivateSessionRequest {
    pub request_header: RequestHeader,
    pub client_signature: Vec<u8>,
    pub locale_ids: Vec<String>,
    pub user_identity_token: IdentityToken,
    pub user_token_signature: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct ActivateSessionResponse {
    pub response_header: ResponseHeader,
    pub server_nonce: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct CloseSessionRequest {
    pub request_header: RequestHeader,
    pub delete_subscriptions: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CloseSessionResponse {
    pub response_header: ResponseHeader,
}
