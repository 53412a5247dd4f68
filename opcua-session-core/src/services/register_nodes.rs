//! RegisterNodes/UnregisterNodes, FindServers and DeleteSubscriptions.
//! Grounded on `async-opcua-server::services::discovery` for FindServers
//! (a single, statically-configured `ApplicationDescription` is echoed
//! back rather than a multi-server registry, resolving the open question
//! of whether this core needs to model the full discovery registry: it
//! doesn't, since the subscription and multi-server discovery engines are
//! out of this core's scope) and on
//! `csrc/services/bgenc/register_nodes.c` for the capacity check.

use opcua_core_types::{
    ApplicationDescription, DeleteSubscriptionsRequest, DeleteSubscriptionsResponse,
    FindServersRequest, FindServersResponse, RegisterNodesRequest, RegisterNodesResponse,
    ResponseHeader, StatusCode, UnregisterNodesRequest, UnregisterNodesResponse,
};

pub fn handle_register_nodes(
    max_register_nodes: usize,
    req: &RegisterNodesRequest,
) -> RegisterNodesResponse {
    if req.nodes_to_register.len() > max_register_nodes {
        return RegisterNodesResponse {
            response_header: opcua_core_types::ResponseHeader::new_error(
                &req.request_header,
                StatusCode::BadTooManyOps,
            ),
            registered_node_ids: Vec::new(),
        };
    }
    RegisterNodesResponse {
        response_header: ResponseHeader::new_good(&req.request_header),
        registered_node_ids: req.nodes_to_register.clone(),
    }
}

pub fn handle_unregister_nodes(req: &UnregisterNodesRequest) -> UnregisterNodesResponse {
    UnregisterNodesResponse {
        response_header: ResponseHeader::new_good(&req.request_header),
    }
}

/// `own` is this server's single, statically-configured application
/// record; a server hosting more than one application would need a
/// registry this core deliberately doesn't model.
pub fn handle_find_servers(
    own: &ApplicationDescription,
    req: &FindServersRequest,
) -> FindServersResponse {
    let matches = req.server_uris.is_empty()
        || req.server_uris.iter().any(|uri| uri == &own.application_uri);
    FindServersResponse {
        response_header: ResponseHeader::new_good(&req.request_header),
        servers: if matches { vec![own.clone()] } else { Vec::new() },
    }
}

/// The subscription engine itself is out of scope; this core only
/// acknowledges the deletion so the dispatcher has a response to send.
pub fn handle_delete_subscriptions(
    req: &DeleteSubscriptionsRequest,
) -> DeleteSubscriptionsResponse {
    let results = req.subscription_ids.iter().map(|_| StatusCode::Good).collect();
    DeleteSubscriptionsResponse {
        response_header: ResponseHeader::new_good(&req.request_header),
        results,
    }
}
