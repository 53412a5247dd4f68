//! TranslateBrowsePathsToNodeIds, grounded on
//! `csrc/services/bgenc/translate_browse_paths_to_node_ids.c` for the
//! relative-path walk and on `async-opcua-server::node_manager::view` for
//! the Rust-idiomatic shape.

use opcua_core_types::{
    BrowsePath, BrowsePathResult, BrowsePathTarget, NodeId, RelativePathElement, StatusCode,
    TranslateBrowsePathsToNodeIdsRequest, TranslateBrowsePathsToNodeIdsResponse,
};

use crate::address_space::AddressSpace;

fn step(
    addr: &dyn AddressSpace,
    current: &[NodeId],
    elem: &RelativePathElement,
) -> Vec<NodeId> {
    let mut next = Vec::new();
    for node in current {
        for r in addr.references(node) {
            let direction_ok = if elem.is_inverse { !r.is_forward } else { r.is_forward };
            if !direction_ok {
                continue;
            }
            let type_ok = match &elem.reference_type_id {
                None => true,
                Some(wanted) => {
                    &r.reference_type_id == wanted
                        || (elem.include_subtypes
                            && addr.is_transitive_subtype(&r.reference_type_id, wanted))
                }
            };
            if !type_ok {
                continue;
            }
            if elem.target_name == "*" {
                next.push(r.target_node_id.clone());
                continue;
            }
            if let Some(summary) = addr.node_summary(&r.target_node_id) {
                if summary.browse_name.name == elem.target_name {
                    next.push(r.target_node_id.clone());
                }
            }
        }
    }
    next
}

fn resolve(addr: &dyn AddressSpace, path: &BrowsePath) -> BrowsePathResult {
    if path.starting_node != NodeId::objects_folder() {
        return BrowsePathResult {
            status: StatusCode::BadNoMatch,
            targets: Vec::new(),
        };
    }
    if path.relative_path.is_empty() {
        return BrowsePathResult {
            status: StatusCode::BadNothingToDo,
            targets: Vec::new(),
        };
    }
    if path.relative_path.iter().any(|e| e.target_name.is_empty()) {
        return BrowsePathResult {
            status: StatusCode::BadBrowseNameInvalid,
            targets: Vec::new(),
        };
    }
    let last = path.relative_path.len() - 1;
    if path
        .relative_path
        .iter()
        .enumerate()
        .any(|(i, e)| e.target_name == "*" && i != last)
    {
        // A wildcard is only meaningful as the final hop; anywhere else it
        // would expand to every reference and make the preceding hops moot.
        return BrowsePathResult {
            status: StatusCode::BadBrowseNameInvalid,
            targets: Vec::new(),
        };
    }

    let mut current = vec![path.starting_node.clone()];
    for elem in &path.relative_path {
        current = step(addr, &current, elem);
        if current.is_empty() {
            return BrowsePathResult {
                status: StatusCode::BadNoMatch,
                targets: Vec::new(),
            };
        }
    }

    BrowsePathResult {
        status: StatusCode::Good,
        targets: current
            .into_iter()
            .map(|target_id| BrowsePathTarget {
                target_id,
                remaining_path_index: None,
            })
            .collect(),
    }
}

pub fn handle_translate_browse_paths(
    addr: &dyn AddressSpace,
    req: &TranslateBrowsePathsToNodeIdsRequest,
) -> TranslateBrowsePathsToNodeIdsResponse {
    let results = req.browse_paths.iter().map(|p| resolve(addr, p)).collect();
    TranslateBrowsePathsToNodeIdsResponse {
        response_header: opcua_core_types::ResponseHeader::new_good(&req.request_header),
        results,
    }
}
