//! End-to-end coverage of the dispatcher driving the channel, session and
//! continuation-point registries together, against a small in-memory
//! address space and an always-anonymous user manager.

use std::collections::HashMap;

use opcua_core_types::{
    AccessLevel, ActivateSessionRequest, ApplicationDescription, AttributeId, BrowseDescription,
    BrowseDirection, BrowseRequest, CloseSessionRequest, CreateSessionRequest, DataValue,
    IdentityToken, NodeClass, NodeId, QualifiedName, ReferenceDescriptor, RequestHeader,
    RequestMessage, ResponseMessage, StatusCode, UserToken, Variant, WriteRequest, WriteValue,
};

use crate::address_space::{AddressSpace, AuthOperation, NodeSummary};
use crate::app_callback::ApplicationCallback;
use crate::dispatcher::Dispatcher;
use crate::limits::RuntimeLimits;
use crate::security::UserManager;
use crate::session::SessionState;

struct NoopCallback;
impl ApplicationCallback for NoopCallback {
    fn srv_write_notification(&self, _write_value: &WriteValue, _status: StatusCode) {}
    fn cli_service_response(&self, _session: u32, _response: &ResponseMessage, _status: StatusCode) {}
}

struct TestStore {
    access: HashMap<String, AccessLevel>,
    values: HashMap<String, DataValue>,
    refs: HashMap<String, Vec<ReferenceDescriptor>>,
    subtypes: Vec<(NodeId, NodeId)>,
}

impl TestStore {
    fn key(node: &NodeId) -> String {
        node.to_string()
    }
}

impl AddressSpace for TestStore {
    fn node_summary(&self, node: &NodeId) -> Option<NodeSummary> {
        if *node == NodeId::objects_folder() || self.values.contains_key(&Self::key(node)) {
            Some(NodeSummary {
                node_class: NodeClass::Variable,
                browse_name: QualifiedName::new(1, Self::key(node)),
                display_name: Default::default(),
                type_definition: None,
            })
        } else {
            None
        }
    }

    fn access_level(&self, node: &NodeId) -> Option<AccessLevel> {
        self.access.get(&Self::key(node)).copied()
    }

    fn references(&self, node: &NodeId) -> &[ReferenceDescriptor] {
        self.refs.get(&Self::key(node)).map(|v| v.as_slice()).unwrap_or(&[])
    }

    fn read_attribute(
        &self,
        node: &NodeId,
        _attribute: AttributeId,
        _index_range: &str,
    ) -> (StatusCode, DataValue) {
        (
            StatusCode::Good,
            self.values.get(&Self::key(node)).cloned().unwrap_or_default(),
        )
    }

    fn set_value(
        &mut self,
        node: &NodeId,
        value: DataValue,
        _index_range: &str,
    ) -> (StatusCode, Option<DataValue>) {
        (StatusCode::Good, self.values.insert(Self::key(node), value))
    }

    fn is_transitive_subtype(&self, subtype: &NodeId, parent: &NodeId) -> bool {
        self.subtypes.iter().any(|(s, p)| s == subtype && p == parent)
    }

    fn authorize(
        &self,
        _op: AuthOperation,
        _node: &NodeId,
        _attribute: AttributeId,
        _user: &UserToken,
    ) -> bool {
        true
    }
}

struct AlwaysAnonymous;
impl UserManager for AlwaysAnonymous {
    fn authenticate(&self, _endpoint: u32, _token: &IdentityToken) -> Result<UserToken, StatusCode> {
        Ok(UserToken::anonymous())
    }
}

fn own_app() -> ApplicationDescription {
    ApplicationDescription {
        application_uri: "urn:test:server".to_string(),
        application_name: Default::default(),
        discovery_urls: vec!["opc.tcp://localhost:4841".to_string()],
    }
}

fn create_and_activate(dispatcher: &mut Dispatcher, addr: &mut dyn AddressSpace, channel: u32) -> NodeId {
    let create_resp = dispatcher.dispatch_request(
        channel,
        0,
        RequestMessage::CreateSession(Box::new(CreateSessionRequest {
            request_header: RequestHeader::default(),
            endpoint_url: "opc.tcp://localhost:4841".to_string(),
            session_name: "s".to_string(),
            client_nonce: Vec::new(),
            requested_session_timeout: 60_000.0,
        })),
        addr,
        &AlwaysAnonymous,
        &own_app(),
        &NoopCallback,
    );
    let token = match create_resp {
        ResponseMessage::CreateSession(r) => r.authentication_token,
        other => panic!("unexpected response: {other:?}"),
    };

    let activate_resp = dispatcher.dispatch_request(
        channel,
        0,
        RequestMessage::ActivateSession(Box::new(ActivateSessionRequest {
            request_header: RequestHeader {
                authentication_token: token.clone(),
                ..Default::default()
            },
            client_signature: Vec::new(),
            locale_ids: Vec::new(),
            user_identity_token: IdentityToken::Anonymous,
            user_token_signature: Vec::new(),
        })),
        addr,
        &AlwaysAnonymous,
        &own_app(),
        &NoopCallback,
    );
    assert!(matches!(activate_resp, ResponseMessage::ActivateSession(_)));
    token
}

#[test]
fn happy_path_create_activate_close() {
    let mut dispatcher = Dispatcher::new(RuntimeLimits::default());
    let mut addr = TestStore {
        access: HashMap::new(),
        values: HashMap::new(),
        refs: HashMap::new(),
        subtypes: Vec::new(),
    };
    dispatcher.channels.server_new(
        0,
        1,
        7,
        0,
        crate::channel_manager::SecurityPolicy::none(),
    );
    let token = create_and_activate(&mut dispatcher, &mut addr, 7);

    let close_resp = dispatcher.dispatch_request(
        7,
        0,
        RequestMessage::CloseSession(Box::new(CloseSessionRequest {
            request_header: RequestHeader {
                authentication_token: token,
                ..Default::default()
            },
            delete_subscriptions: true,
        })),
        &mut addr,
        &AlwaysAnonymous,
        &own_app(),
        &NoopCallback,
    );
    assert!(matches!(close_resp, ResponseMessage::CloseSession(_)));
}

#[test]
fn write_with_access_control_succeeds() {
    let mut dispatcher = Dispatcher::new(RuntimeLimits::default());
    let node = NodeId::new(1, 10u32);
    let mut addr = TestStore {
        access: HashMap::from([(node.to_string(), AccessLevel(AccessLevel::CURRENT_WRITE))]),
        values: HashMap::from([(node.to_string(), DataValue::new_good(Variant::Int32(0)))]),
        refs: HashMap::new(),
        subtypes: Vec::new(),
    };
    dispatcher.channels.server_new(0, 1, 7, 0, crate::channel_manager::SecurityPolicy::none());
    let token = create_and_activate(&mut dispatcher, &mut addr, 7);

    let resp = dispatcher.dispatch_request(
        7,
        0,
        RequestMessage::Write(Box::new(WriteRequest {
            request_header: RequestHeader {
                authentication_token: token,
                ..Default::default()
            },
            nodes_to_write: vec![WriteValue {
                node_id: node,
                attribute_id: AttributeId::Value,
                value: DataValue::new_good(Variant::Int32(99)),
                index_range: String::new(),
                invalid: None,
            }],
        })),
        &mut addr,
        &AlwaysAnonymous,
        &own_app(),
        &NoopCallback,
    );
    match resp {
        ResponseMessage::Write(r) => assert!(r.results[0].is_good()),
        other => panic!("unexpected response: {other:?}"),
    }
}

#[test]
fn write_to_non_writable_attribute_is_rejected() {
    let mut dispatcher = Dispatcher::new(RuntimeLimits::default());
    let node = NodeId::new(1, 11u32);
    let mut addr = TestStore {
        access: HashMap::from([(node.to_string(), AccessLevel(AccessLevel::CURRENT_READ))]),
        values: HashMap::from([(node.to_string(), DataValue::new_good(Variant::Int32(0)))]),
        refs: HashMap::new(),
        subtypes: Vec::new(),
    };
    dispatcher.channels.server_new(0, 1, 7, 0, crate::channel_manager::SecurityPolicy::none());
    let token = create_and_activate(&mut dispatcher, &mut addr, 7);

    let resp = dispatcher.dispatch_request(
        7,
        0,
        RequestMessage::Write(Box::new(WriteRequest {
            request_header: RequestHeader {
                authentication_token: token,
                ..Default::default()
            },
            nodes_to_write: vec![WriteValue {
                node_id: node,
                attribute_id: AttributeId::Value,
                value: DataValue::new_good(Variant::Int32(99)),
                index_range: String::new(),
                invalid: None,
            }],
        })),
        &mut addr,
        &AlwaysAnonymous,
        &own_app(),
        &NoopCallback,
    );
    match resp {
        ResponseMessage::Write(r) => assert_eq!(r.results[0], StatusCode::BadNotWritable),
        other => panic!("unexpected response: {other:?}"),
    }
}

#[test]
fn browse_with_subtype_inclusion_and_continuation_point() {
    let mut dispatcher = Dispatcher::new(RuntimeLimits::default());
    let hierarchical = NodeId::new(0, 33u32);
    let organizes = NodeId::new(0, 35u32);
    let targets: Vec<_> = (0..4).map(|i| NodeId::new(1, 100 + i)).collect();
    let refs = targets
        .iter()
        .map(|t| ReferenceDescriptor {
            reference_type_id: organizes.clone(),
            is_forward: true,
            target_node_id: t.clone(),
        })
        .collect();
    let mut addr = TestStore {
        access: HashMap::new(),
        values: HashMap::new(),
        refs: HashMap::from([(NodeId::objects_folder().to_string(), refs)]),
        subtypes: vec![(organizes.clone(), hierarchical.clone())],
    };
    dispatcher.channels.server_new(0, 1, 7, 0, crate::channel_manager::SecurityPolicy::none());
    let token = create_and_activate(&mut dispatcher, &mut addr, 7);

    let resp = dispatcher.dispatch_request(
        7,
        0,
        RequestMessage::Browse(Box::new(BrowseRequest {
            request_header: RequestHeader {
                authentication_token: token,
                ..Default::default()
            },
            nodes_to_browse: vec![BrowseDescription {
                node_id: NodeId::objects_folder(),
                browse_direction: BrowseDirection::Forward,
                reference_type_id: Some(hierarchical),
                include_subtypes: true,
                max_target_references: 2,
            }],
        })),
        &mut addr,
        &AlwaysAnonymous,
        &own_app(),
        &NoopCallback,
    );
    match resp {
        ResponseMessage::Browse(r) => {
            assert_eq!(r.results[0].references.len(), 2);
            assert!(r.results[0].continuation_point.is_some());
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[test]
fn channel_lost_during_user_activated_orphans_session() {
    let mut dispatcher = Dispatcher::new(RuntimeLimits::default());
    let mut addr = TestStore {
        access: HashMap::new(),
        values: HashMap::new(),
        refs: HashMap::new(),
        subtypes: Vec::new(),
    };
    dispatcher.channels.server_new(0, 1, 7, 0, crate::channel_manager::SecurityPolicy::none());
    let token = create_and_activate(&mut dispatcher, &mut addr, 7);
    let session_id = dispatcher.sessions.find_by_token(&token).unwrap();

    let closed = dispatcher.handle_transport_event(crate::transport::TransportEvent::ChannelLost { channel: 7 });
    assert!(closed.is_empty());
    assert_eq!(dispatcher.sessions.get(session_id).unwrap().state(), SessionState::ScOrphaned);
}

#[test]
fn reactivation_from_orphan_on_new_channel() {
    let mut dispatcher = Dispatcher::new(RuntimeLimits::default());
    let mut addr = TestStore {
        access: HashMap::new(),
        values: HashMap::new(),
        refs: HashMap::new(),
        subtypes: Vec::new(),
    };
    dispatcher.channels.server_new(0, 1, 7, 0, crate::channel_manager::SecurityPolicy::none());
    let token = create_and_activate(&mut dispatcher, &mut addr, 7);
    dispatcher.handle_transport_event(crate::transport::TransportEvent::ChannelLost { channel: 7 });

    dispatcher.channels.server_new(0, 2, 9, 1, crate::channel_manager::SecurityPolicy::none());
    let resp = dispatcher.dispatch_request(
        9,
        0,
        RequestMessage::ActivateSession(Box::new(ActivateSessionRequest {
            request_header: RequestHeader {
                authentication_token: token.clone(),
                ..Default::default()
            },
            client_signature: Vec::new(),
            locale_ids: Vec::new(),
            user_identity_token: IdentityToken::Anonymous,
            user_token_signature: Vec::new(),
        })),
        &mut addr,
        &AlwaysAnonymous,
        &own_app(),
        &NoopCallback,
    );
    assert!(matches!(resp, ResponseMessage::ActivateSession(_)));
    let session_id = dispatcher.sessions.find_by_token(&token).unwrap();
    assert_eq!(dispatcher.sessions.get(session_id).unwrap().channel(), Some(9));
}
