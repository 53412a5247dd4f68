//! Typed request/response payloads, grounded on
//! `async-opcua-types::generated::types`. The real workspace generates ~200
//! of these from the OPC UA XML schema via `async-opcua-codegen`; this core
//! only needs the session-treatment and session-service pairs the
//! dispatcher actually routes, hand-written in the same shape the
//! generated structs have (a `request_header`/`response_header` field plus
//! the service-specific parameters).

mod browse;
mod discovery;
mod read_write;
mod register_nodes;
mod session;
mod subscriptions;
mod translate_browse_paths;

pub use browse::*;
pub use discovery::*;
pub use read_write::*;
pub use register_nodes::*;
pub use session::*;
pub use subscriptions::*;
pub use translate_browse_paths::*;
