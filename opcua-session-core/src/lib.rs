//! Session/secure-channel coordination and service dispatch for an OPC UA
//! endpoint, independent of wire codec, crypto and address-space storage.
//!
//! The crate owns three cooperating registries — the Channel Manager, the
//! Session Manager (itself built on the per-session state machine) and the
//! Continuation-Point Registry — plus a Request-Handle Table for
//! client-side correlation, all wired together by the `Dispatcher`. Every
//! external capability this core needs but doesn't implement (transport,
//! wire codec, address-space storage, authentication, application
//! notification) is expressed as a trait in this crate and supplied by the
//! embedding application.

pub mod address_space;
pub mod app_callback;
pub mod channel_manager;
pub mod codec;
pub mod continuation_points;
pub mod dispatcher;
pub mod limits;
pub mod request_handle_table;
pub mod security;
pub mod services;
pub mod session;
pub mod transport;

#[cfg(test)]
mod integration_tests;

pub use address_space::{AddressSpace, AuthOperation, NodeSummary};
pub use app_callback::ApplicationCallback;
pub use channel_manager::{Channel, ChannelConfigIdx, ChannelId, ChannelManager, EndpointConfigIdx, SecurityPolicy};
pub use codec::{DecodedMessage, MessageCodec, MessageDirection};
pub use continuation_points::{BrowseContinuationState, ContinuationPointRegistry};
pub use dispatcher::Dispatcher;
pub use limits::RuntimeLimits;
pub use request_handle_table::{PendingRequest, ReleaseReason, RequestHandleId, RequestHandleTable};
pub use security::UserManager;
pub use session::{Session, SessionCrypto, SessionManager, SessionState};
pub use transport::{RequestContext, Transport, TransportEvent};
