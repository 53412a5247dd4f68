//! Continuation-Point Registry, grounded on
//! `csrc/services/bgenc/browse_treatment_continuation_points.c` for the
//! semantics and on `async-opcua-server::node_manager::view`'s
//! `BrowseContinuationPoint` for the Rust shape. Keyed per session, bounded
//! per-session, with an opaque random handle rather than a predictable
//! index.

use hashbrown::HashMap;
use rand::RngCore;

use opcua_core_types::{BrowseDirection, ContinuationPointHandle, NodeId};

/// Iterator state for a paginated Browse.
#[derive(Debug, Clone)]
pub struct BrowseContinuationState {
    pub source_node: NodeId,
    pub start_index: usize,
    pub direction: BrowseDirection,
    pub reference_type_id: Option<NodeId>,
    pub include_subtypes: bool,
}

#[derive(Default)]
pub struct ContinuationPointRegistry {
    max_per_session: usize,
    points: HashMap<u32, HashMap<ContinuationPointHandle, BrowseContinuationState>>,
}

impl ContinuationPointRegistry {
    pub fn new(max_per_session: usize) -> Self {
        Self {
            max_per_session,
            points: HashMap::new(),
        }
    }

    /// Returns `true` iff a continuation point was actually created. The
    /// B-model source this was distilled from sets its success flag to
    /// `false` right after a successful allocation in its outer layer;
    /// that is treated as a bug and is not reproduced here.
    pub fn create(
        &mut self,
        session_id: u32,
        state: BrowseContinuationState,
    ) -> Option<ContinuationPointHandle> {
        let per_session = self.points.entry(session_id).or_default();
        if per_session.len() >= self.max_per_session {
            return None;
        }
        let mut buf = [0u8; 8];
        rand::thread_rng().fill_bytes(&mut buf);
        let mut handle = ContinuationPointHandle(u64::from_ne_bytes(buf));
        while per_session.contains_key(&handle) {
            rand::thread_rng().fill_bytes(&mut buf);
            handle = ContinuationPointHandle(u64::from_ne_bytes(buf));
        }
        per_session.insert(handle, state);
        Some(handle)
    }

    /// Consumption is destructive: the point is removed whether or not
    /// BrowseNext produces a further continuation point.
    pub fn take(
        &mut self,
        session_id: u32,
        handle: ContinuationPointHandle,
    ) -> Option<BrowseContinuationState> {
        self.points.get_mut(&session_id)?.remove(&handle)
    }

    /// Releases every point owned by a closing session.
    pub fn release_session(&mut self, session_id: u32) {
        self.points.remove(&session_id);
    }

    pub fn count_for_session(&self, session_id: u32) -> usize {
        self.points.get(&session_id).map_or(0, |m| m.len())
    }
}
