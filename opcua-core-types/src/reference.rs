//! Reference traversal types for Browse, grounded on
//! `async-opcua-types::generated::types::browse_description::BrowseDescription`
//! and the matching `BrowseDirection`/`BrowseResultMask` enums.

use crate::node_class::NodeClass;
use crate::node_id::NodeId;
use crate::qualified_name::{LocalizedText, QualifiedName};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseDirection {
    Forward,
    Inverse,
    Both,
}

/// One outgoing or incoming reference from a node, as surfaced by the
/// `AddressSpace` collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceDescriptor {
    pub reference_type_id: NodeId,
    pub is_forward: bool,
    pub target_node_id: NodeId,
}

/// A single resolved Browse result entry.
#[derive(Debug, Clone, Default)]
pub struct ReferenceDescription {
    pub reference_type_id: NodeId,
    pub is_forward: bool,
    pub target_node_id: NodeId,
    pub browse_name: Option<QualifiedName>,
    pub display_name: Option<LocalizedText>,
    pub node_class: Option<NodeClass>,
    pub type_definition: Option<NodeId>,
}
