//! The address-space access capability, grounded on the
//! method surface of `async-opcua-server::node_manager::memory` and
//! `async-opcua-nodes`: `readAll`, `get_NodeClass`/`BrowseName`/
//! `DisplayName`/`AccessLevel`/`TypeDefinition`, reference iteration,
//! `read_Attribute`/`set_Value`, `is_transitive_subtype` and
//! `get_user_authorization`.
//!
//! The node storage engine itself — indices, persistence, schema — is out
//! of scope; this core only ever calls through this trait.

use opcua_core_types::{
    AccessLevel, AttributeId, DataValue, NodeClass, NodeId, QualifiedName, ReferenceDescriptor,
    StatusCode, UserToken,
};

/// What kind of operation is being authorized, passed to
/// `AddressSpace::authorize` so a single trait method covers both Read and
/// Write's distinct authorization checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOperation {
    Read,
    Write,
}

/// A snapshot of the attributes Browse needs to fill a result slot,
/// returned by `AddressSpace::node_summary`.
#[derive(Debug, Clone, Default)]
pub struct NodeSummary {
    pub node_class: NodeClass,
    pub browse_name: QualifiedName,
    pub display_name: opcua_core_types::LocalizedText,
    pub type_definition: Option<NodeId>,
}

/// The store/address-space collaborator. All methods are synchronous: the
/// core runs single-threaded and cooperative, taking the
/// store's own coarse lock for the duration of each call and releasing it
/// before returning to the event queue — that locking is internal to a
/// concrete implementation of this trait, not visible here.
pub trait AddressSpace {
    /// `readAll`: whether the node exists, with enough detail to fill a
    /// Browse result slot if so.
    fn node_summary(&self, node: &NodeId) -> Option<NodeSummary>;

    fn access_level(&self, node: &NodeId) -> Option<AccessLevel>;

    /// The node's outgoing and incoming references, in the store's stable
    /// iteration order (Browse resumes by index into this slice).
    fn references(&self, node: &NodeId) -> &[ReferenceDescriptor];

    /// Read a single attribute under a given user's authorization, minus
    /// the authorization check itself (done separately via `authorize`,
    /// since Write reuses it with a different bypass rule for
    /// local-service writes).
    fn read_attribute(
        &self,
        node: &NodeId,
        attribute: AttributeId,
        index_range: &str,
    ) -> (StatusCode, DataValue);

    /// Write the `Value` attribute, returning the previous value so the
    /// caller can synthesize a data-changed event.
    fn set_value(
        &mut self,
        node: &NodeId,
        value: DataValue,
        index_range: &str,
    ) -> (StatusCode, Option<DataValue>);

    fn is_transitive_subtype(&self, subtype: &NodeId, parent: &NodeId) -> bool;

    fn authorize(
        &self,
        op: AuthOperation,
        node: &NodeId,
        attribute: AttributeId,
        user: &UserToken,
    ) -> bool;
}
