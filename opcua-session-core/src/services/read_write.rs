//! Read and Write, grounded on `async-opcua-server::node_manager::memory`'s
//! per-node read/write path. Read: existence check, authorization, then the
//! actual read. Write: existence check, then (unless the call is a
//! local-service write issued by the application itself) an access-level
//! check and authorization, then the actual write and a notification to the
//! application for every successful non-local write.

use opcua_core_types::{
    AccessLevel, AttributeId, DataValue, ReadRequest, ReadResponse, ReadValueId, ResponseHeader,
    StatusCode, UserToken, WriteRequest, WriteResponse, WriteValue,
};

use crate::address_space::{AddressSpace, AuthOperation};
use crate::app_callback::ApplicationCallback;

pub fn handle_read(addr: &dyn AddressSpace, user: &UserToken, req: &ReadRequest) -> ReadResponse {
    let results = req
        .nodes_to_read
        .iter()
        .map(|rv| read_one(addr, user, rv))
        .collect();
    ReadResponse {
        response_header: ResponseHeader::new_good(&req.request_header),
        results,
    }
}

fn read_one(addr: &dyn AddressSpace, user: &UserToken, rv: &ReadValueId) -> DataValue {
    if addr.node_summary(&rv.node_id).is_none() {
        return DataValue::new_error(StatusCode::BadNodeIdUnknown);
    }
    if !addr.authorize(AuthOperation::Read, &rv.node_id, rv.attribute_id, user) {
        return DataValue::new_error(StatusCode::BadUserAccessDenied);
    }
    let (status, value) = addr.read_attribute(&rv.node_id, rv.attribute_id, &rv.index_range);
    if status.is_bad() {
        DataValue::new_error(status)
    } else {
        value
    }
}

pub fn handle_write(
    addr: &mut dyn AddressSpace,
    user: &UserToken,
    req: &WriteRequest,
    local_service: bool,
    callback: &dyn ApplicationCallback,
) -> WriteResponse {
    let results = req
        .nodes_to_write
        .iter()
        .map(|wv| write_one(addr, user, wv, local_service, callback))
        .collect();
    WriteResponse {
        response_header: ResponseHeader::new_good(&req.request_header),
        results,
    }
}

fn write_one(
    addr: &mut dyn AddressSpace,
    user: &UserToken,
    wv: &WriteValue,
    local_service: bool,
    callback: &dyn ApplicationCallback,
) -> StatusCode {
    if let Some(status) = wv.invalid {
        return status;
    }
    if wv.attribute_id != AttributeId::Value {
        return StatusCode::BadNotWritable;
    }
    if addr.node_summary(&wv.node_id).is_none() {
        return StatusCode::BadNodeIdUnknown;
    }
    if !local_service {
        match addr.access_level(&wv.node_id) {
            Some(level) if level.contains(AccessLevel::CURRENT_WRITE) => {}
            _ => return StatusCode::BadNotWritable,
        }
        if !addr.authorize(AuthOperation::Write, &wv.node_id, wv.attribute_id, user) {
            return StatusCode::BadUserAccessDenied;
        }
    }
    let (status, _previous) = addr.set_value(&wv.node_id, wv.value.clone(), &wv.index_range);
    if !local_service && status.is_good() {
        callback.srv_write_notification(wv, status);
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use opcua_core_types::{NodeClass, NodeId, QualifiedName, RequestHeader, Variant};
    use std::collections::HashMap;

    #[derive(Default)]
    struct RecordingCallback {
        notifications: std::cell::RefCell<Vec<(NodeId, StatusCode)>>,
    }

    impl ApplicationCallback for RecordingCallback {
        fn srv_write_notification(&self, write_value: &WriteValue, status: StatusCode) {
            self.notifications
                .borrow_mut()
                .push((write_value.node_id.clone(), status));
        }

        fn cli_service_response(
            &self,
            _session: u32,
            _response: &opcua_core_types::ResponseMessage,
            _status: StatusCode,
        ) {
        }
    }

    struct FakeStore {
        values: HashMap<String, DataValue>,
        access: HashMap<String, AccessLevel>,
    }

    impl FakeStore {
        fn key(node: &NodeId) -> String {
            node.to_string()
        }
    }

    impl AddressSpace for FakeStore {
        fn node_summary(&self, node: &NodeId) -> Option<crate::address_space::NodeSummary> {
            self.values.contains_key(&Self::key(node)).then(|| {
                crate::address_space::NodeSummary {
                    node_class: NodeClass::Variable,
                    browse_name: QualifiedName::new(1, "x"),
                    display_name: Default::default(),
                    type_definition: None,
                }
            })
        }

        fn access_level(&self, node: &NodeId) -> Option<AccessLevel> {
            self.access.get(&Self::key(node)).copied()
        }

        fn references(&self, _node: &NodeId) -> &[opcua_core_types::ReferenceDescriptor] {
            &[]
        }

        fn read_attribute(
            &self,
            node: &NodeId,
            _attribute: AttributeId,
            _index_range: &str,
        ) -> (StatusCode, DataValue) {
            (
                StatusCode::Good,
                self.values.get(&Self::key(node)).cloned().unwrap(),
            )
        }

        fn set_value(
            &mut self,
            node: &NodeId,
            value: DataValue,
            _index_range: &str,
        ) -> (StatusCode, Option<DataValue>) {
            let previous = self.values.insert(Self::key(node), value);
            (StatusCode::Good, previous)
        }

        fn is_transitive_subtype(&self, _subtype: &NodeId, _parent: &NodeId) -> bool {
            false
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

    fn store() -> FakeStore {
        let mut values = HashMap::new();
        values.insert("i=2".to_string(), DataValue::new_good(Variant::Int32(42)));
        let mut access = HashMap::new();
        access.insert("i=2".to_string(), AccessLevel(AccessLevel::CURRENT_READ));
        FakeStore { values, access }
    }

    #[test]
    fn read_returns_good_value_for_readable_node() {
        let store = store();
        let req = ReadRequest {
            request_header: RequestHeader::default(),
            nodes_to_read: vec![ReadValueId {
                node_id: NodeId::new(0, 2u32),
                attribute_id: AttributeId::Value,
                index_range: String::new(),
            }],
        };
        let resp = handle_read(&store, &UserToken::anonymous(), &req);
        assert!(resp.results[0].status.is_good());
    }

    #[test]
    fn read_unknown_node_is_bad() {
        let store = store();
        let req = ReadRequest {
            request_header: RequestHeader::default(),
            nodes_to_read: vec![ReadValueId {
                node_id: NodeId::new(0, 999u32),
                attribute_id: AttributeId::Value,
                index_range: String::new(),
            }],
        };
        let resp = handle_read(&store, &UserToken::anonymous(), &req);
        assert_eq!(resp.results[0].status, StatusCode::BadNodeIdUnknown);
    }

    #[test]
    fn write_rejected_without_current_write_access() {
        let mut store = store();
        let callback = RecordingCallback::default();
        let req = WriteRequest {
            request_header: RequestHeader::default(),
            nodes_to_write: vec![WriteValue {
                node_id: NodeId::new(0, 2u32),
                attribute_id: AttributeId::Value,
                value: DataValue::new_good(Variant::Int32(7)),
                index_range: String::new(),
                invalid: None,
            }],
        };
        let resp = handle_write(&mut store, &UserToken::anonymous(), &req, false, &callback);
        assert_eq!(resp.results[0], StatusCode::BadNotWritable);
        assert!(callback.notifications.borrow().is_empty());
    }

    #[test]
    fn write_invalid_preflagged_value_short_circuits() {
        let mut store = store();
        let callback = RecordingCallback::default();
        let req = WriteRequest {
            request_header: RequestHeader::default(),
            nodes_to_write: vec![WriteValue {
                node_id: NodeId::new(0, 2u32),
                attribute_id: AttributeId::Value,
                value: DataValue::new_good(Variant::Int32(7)),
                index_range: String::new(),
                invalid: Some(StatusCode::BadDecodingError),
            }],
        };
        let resp = handle_write(&mut store, &UserToken::anonymous(), &req, false, &callback);
        assert_eq!(resp.results[0], StatusCode::BadDecodingError);
    }

    #[test]
    fn successful_non_local_write_fires_notification() {
        let mut store = store();
        let callback = RecordingCallback::default();
        let node = NodeId::new(0, 2u32);
        store
            .access
            .insert(FakeStore::key(&node), AccessLevel(AccessLevel::CURRENT_WRITE));
        let req = WriteRequest {
            request_header: RequestHeader::default(),
            nodes_to_write: vec![WriteValue {
                node_id: node.clone(),
                attribute_id: AttributeId::Value,
                value: DataValue::new_good(Variant::Int32(7)),
                index_range: String::new(),
                invalid: None,
            }],
        };
        let resp = handle_write(&mut store, &UserToken::anonymous(), &req, false, &callback);
        assert!(resp.results[0].is_good());
        assert_eq!(
            callback.notifications.borrow().as_slice(),
            &[(node, StatusCode::Good)]
        );
    }

    #[test]
    fn local_service_write_bypasses_access_control_and_skips_notification() {
        let mut store = store();
        let callback = RecordingCallback::default();
        let req = WriteRequest {
            request_header: RequestHeader::default(),
            nodes_to_write: vec![WriteValue {
                node_id: NodeId::new(0, 2u32),
                attribute_id: AttributeId::Value,
                value: DataValue::new_good(Variant::Int32(7)),
                index_range: String::new(),
                invalid: None,
            }],
        };
        let resp = handle_write(&mut store, &UserToken::anonymous(), &req, true, &callback);
        assert!(resp.results[0].is_good());
        assert!(callback.notifications.borrow().is_empty());
    }
}
