//! Client-side request-handle correlation table, grounded
//! on `async-opcua-client::session::request_builder` and the
//! `RequestHandle` lifecycle it implements.

use hashbrown::HashMap;

use opcua_core_types::{IndexingType, RequestKind};

use crate::channel_manager::ChannelId;

pub type RequestHandleId = IndexingType;

/// Bookkeeping for one outstanding client request. `app_context` is
/// opaque to this table; it is handed
/// back to the application callback collaborator on completion.
pub struct PendingRequest<C> {
    pub request_kind: RequestKind,
    pub expected_response_kind: RequestKind,
    pub channel: ChannelId,
    pub is_applicative: bool,
    pub app_context: C,
}

#[derive(Default)]
pub struct RequestHandleTable<C> {
    next_id: RequestHandleId,
    pending: HashMap<RequestHandleId, PendingRequest<C>>,
}

/// Why a pending request was released without a normal response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseReason {
    ResponseDelivered,
    Timeout,
    ChannelLost,
    ResponseMismatch,
}

impl<C> RequestHandleTable<C> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: HashMap::new(),
        }
    }

    /// Allocates a fresh handle and binds it to `channel` at send time.
    pub fn allocate(
        &mut self,
        request_kind: RequestKind,
        expected_response_kind: RequestKind,
        channel: ChannelId,
        is_applicative: bool,
        app_context: C,
    ) -> RequestHandleId {
        self.next_id += 1;
        let id = self.next_id;
        self.pending.insert(
            id,
            PendingRequest {
                request_kind,
                expected_response_kind,
                channel,
                is_applicative,
                app_context,
            },
        );
        id
    }

    /// Accepts a response only if the handle exists, its channel matches
    /// the delivering channel, and the response type matches what was
    /// expected. On any mismatch the handle is released and the caller
    /// should drop the message.
    pub fn accept_response(
        &mut self,
        handle: RequestHandleId,
        delivering_channel: ChannelId,
        delivered_kind: RequestKind,
    ) -> Result<PendingRequest<C>, Option<PendingRequest<C>>> {
        let Some(pending) = self.pending.get(&handle) else {
            return Err(None);
        };
        if pending.channel != delivering_channel || pending.expected_response_kind != delivered_kind
        {
            return Err(self.pending.remove(&handle));
        }
        Ok(self.pending.remove(&handle).expect("checked above"))
    }

    /// Releases every handle bound to `channel` on `channel_lost`.
    pub fn release_for_channel(&mut self, channel: ChannelId) -> Vec<PendingRequest<C>> {
        let ids: Vec<_> = self
            .pending
            .iter()
            .filter(|(_, p)| p.channel == channel)
            .map(|(id, _)| *id)
            .collect();
        ids.into_iter()
            .filter_map(|id| self.pending.remove(&id))
            .collect()
    }

    pub fn release(&mut self, handle: RequestHandleId) -> Option<PendingRequest<C>> {
        self.pending.remove(&handle)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
