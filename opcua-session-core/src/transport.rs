//! The secure-channel transport collaborator, grounded on
//! `async-opcua-client::transport`'s `SessionEventLoopState` enum for
//! representing inbound connection events as data rather than callbacks,
//! and on `async-opcua-core::comms` for the open/close/send shape.

use opcua_core_types::StatusCode;

use crate::channel_manager::{ChannelConfigIdx, ChannelId};
use crate::request_handle_table::RequestHandleId;

/// Opaque correlation carried alongside an outbound buffer so the
/// transport can report a send failure back against the right pending
/// request without understanding message contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext(pub RequestHandleId);

/// Commands issued to the transport collaborator. Implementations own the
/// actual socket/TLS state; this core only ever asks for a channel to be
/// opened, closed, or written to.
pub trait Transport {
    fn open(&mut self, config_idx: ChannelConfigIdx);
    fn close(&mut self, channel: ChannelId);
    fn send(&mut self, channel: ChannelId, buffer: Vec<u8>, request_context: RequestContext);
    fn send_error(&mut self, channel: ChannelId, status: StatusCode, request_context: RequestContext);
}

/// Inbound events the transport reports back into the dispatcher's event
/// loop, matching the enum shape of `SessionEventLoopState` rather than a
/// callback interface.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    ChannelConnected {
        config_idx: ChannelConfigIdx,
        channel: ChannelId,
        endpoint_idx: Option<u32>,
        connected_at: u64,
        security_policy: crate::channel_manager::SecurityPolicy,
    },
    ChannelLost {
        channel: ChannelId,
    },
    Message {
        channel: ChannelId,
        buffer: Vec<u8>,
    },
    ConnectTimeout {
        config_idx: ChannelConfigIdx,
    },
}
