//! The wire-codec collaborator, grounded on `async-opcua-types`'s generated
//! binary encode/decode plus `async-opcua-core::comms::secure_channel`'s
//! chunk-to-message reassembly. Decoding bytes into `RequestMessage`/
//! encoding `ResponseMessage` back into bytes is entirely the embedding
//! application's concern; this core only ever sees the already-typed
//! envelopes produced on one side of this trait.

use opcua_core_types::{RequestMessage, ResponseMessage, StatusCode};

/// Whether a buffer handed to `decode` holds a request or a response,
/// since the two sides of a channel decode different message tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageDirection {
    Request,
    Response,
}

pub trait MessageCodec {
    /// Reassembles and decodes one complete service message from a
    /// transport-delivered buffer. Chunking, secure-channel decryption and
    /// signature verification all happen before this is called; a
    /// malformed or unsupported message type is rejected here and never
    /// reaches the dispatcher.
    fn decode(
        &self,
        direction: MessageDirection,
        buffer: &[u8],
    ) -> Result<DecodedMessage, StatusCode>;

    fn encode(&self, response: &ResponseMessage) -> Result<Vec<u8>, StatusCode>;
}

/// What `MessageCodec::decode` hands back for an inbound request: the
/// typed request plus the security header fields the dispatcher needs to
/// resolve which channel and endpoint delivered it.
#[derive(Debug, Clone)]
pub struct DecodedMessage {
    pub request: RequestMessage,
    pub secure_channel_id: u32,
}
