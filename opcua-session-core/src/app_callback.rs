//! The embedding application's notification sink, grounded on
//! `async-opcua-server::callbacks`/`async-opcua-client::callbacks` for the
//! write-notification and response-delivery shape.

use opcua_core_types::{ResponseMessage, StatusCode, WriteValue};

pub trait ApplicationCallback {
    /// Fired after a successful server-side Write, so the application can
    /// react to a data change; the actual event/monitored-item fan-out is
    /// the PubSub/subscription collaborator's job, out of scope here.
    fn srv_write_notification(&self, write_value: &WriteValue, status: StatusCode);

    /// Delivers a correlated response to a client-side caller once the
    /// `RequestHandleTable` has matched it to its originating request.
    fn cli_service_response(&self, session: u32, response: &ResponseMessage, status: StatusCode);
}
