//! Browse and BrowseNext, grounded on `csrc/services/bgenc/browse_treatment.c`
//! for the reference-filtering and pagination semantics and on
//! `async-opcua-server::node_manager::view` for the Rust-idiomatic shape.

use opcua_core_types::{
    BrowseDescription, BrowseDirection, BrowseNextRequest, BrowseNextResponse, BrowseRequest,
    BrowseResponse, BrowseResult, NodeId, ReferenceDescription, ReferenceDescriptor,
    ResponseHeader, StatusCode,
};

use crate::address_space::AddressSpace;
use crate::continuation_points::{BrowseContinuationState, ContinuationPointRegistry};

fn matches(
    addr: &dyn AddressSpace,
    r: &ReferenceDescriptor,
    direction: BrowseDirection,
    reference_type_id: &Option<NodeId>,
    include_subtypes: bool,
) -> bool {
    let direction_ok = match direction {
        BrowseDirection::Forward => r.is_forward,
        BrowseDirection::Inverse => !r.is_forward,
        BrowseDirection::Both => true,
    };
    if !direction_ok {
        return false;
    }
    match reference_type_id {
        None => true,
        Some(wanted) => {
            &r.reference_type_id == wanted
                || (include_subtypes && addr.is_transitive_subtype(&r.reference_type_id, wanted))
        }
    }
}

fn describe(addr: &dyn AddressSpace, r: &ReferenceDescriptor) -> ReferenceDescription {
    let summary = addr.node_summary(&r.target_node_id);
    ReferenceDescription {
        reference_type_id: r.reference_type_id.clone(),
        is_forward: r.is_forward,
        target_node_id: r.target_node_id.clone(),
        browse_name: summary.as_ref().map(|s| s.browse_name.clone()),
        display_name: summary.as_ref().map(|s| s.display_name.clone()),
        node_class: summary.as_ref().map(|s| s.node_class),
        type_definition: summary.as_ref().and_then(|s| s.type_definition.clone()),
    }
}

fn browse_one(
    addr: &dyn AddressSpace,
    continuations: &mut ContinuationPointRegistry,
    session_id: u32,
    desc: &BrowseDescription,
) -> BrowseResult {
    if addr.node_summary(&desc.node_id).is_none() {
        return BrowseResult {
            status: StatusCode::BadNodeIdUnknown,
            ..Default::default()
        };
    }
    let filtered: Vec<&ReferenceDescriptor> = addr
        .references(&desc.node_id)
        .iter()
        .filter(|r| {
            matches(
                addr,
                r,
                desc.browse_direction,
                &desc.reference_type_id,
                desc.include_subtypes,
            )
        })
        .collect();

    let cap = if desc.max_target_references == 0 {
        filtered.len()
    } else {
        (desc.max_target_references as usize).min(filtered.len())
    };
    let references: Vec<ReferenceDescription> =
        filtered[..cap].iter().map(|r| describe(addr, r)).collect();

    if cap == filtered.len() {
        return BrowseResult {
            status: StatusCode::Good,
            continuation_point: None,
            references,
        };
    }

    let continuation_point = continuations.create(
        session_id,
        BrowseContinuationState {
            source_node: desc.node_id.clone(),
            start_index: cap,
            direction: desc.browse_direction,
            reference_type_id: desc.reference_type_id.clone(),
            include_subtypes: desc.include_subtypes,
        },
    );
    let status = if continuation_point.is_some() {
        StatusCode::Good
    } else {
        StatusCode::BadNoContinuationPoints
    };
    BrowseResult {
        status,
        continuation_point,
        references,
    }
}

pub fn handle_browse(
    addr: &dyn AddressSpace,
    continuations: &mut ContinuationPointRegistry,
    session_id: u32,
    req: &BrowseRequest,
) -> BrowseResponse {
    let results = req
        .nodes_to_browse
        .iter()
        .map(|desc| browse_one(addr, continuations, session_id, desc))
        .collect();
    BrowseResponse {
        response_header: ResponseHeader::new_good(&req.request_header),
        results,
    }
}

pub fn handle_browse_next(
    addr: &dyn AddressSpace,
    continuations: &mut ContinuationPointRegistry,
    session_id: u32,
    req: &BrowseNextRequest,
) -> BrowseNextResponse {
    let results = req
        .continuation_points
        .iter()
        .map(|&handle| {
            let Some(state) = continuations.take(session_id, handle) else {
                return BrowseResult {
                    status: StatusCode::BadContinuationPointInvalid,
                    ..Default::default()
                };
            };
            if req.release_continuation_points {
                return BrowseResult {
                    status: StatusCode::Good,
                    ..Default::default()
                };
            }
            let filtered: Vec<&ReferenceDescriptor> = addr
                .references(&state.source_node)
                .iter()
                .filter(|r| {
                    matches(
                        addr,
                        r,
                        state.direction,
                        &state.reference_type_id,
                        state.include_subtypes,
                    )
                })
                .collect();
            let start = state.start_index.min(filtered.len());
            let references = filtered[start..].iter().map(|r| describe(addr, r)).collect();
            BrowseResult {
                status: StatusCode::Good,
                continuation_point: None,
                references,
            }
        })
        .collect();
    BrowseNextResponse {
        response_header: ResponseHeader::new_good(&req.request_header),
        results,
    }
}
