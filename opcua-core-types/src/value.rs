//! `Variant` and `DataValue`, grounded on `async-opcua-types::variant` and
//! `async-opcua-types::data_value`.
//!
//! The teacher's `Variant` is a large enum covering every built-in OPC UA
//! scalar type plus multi-dimensional arrays and extension objects; this
//! trims it to the handful of scalar kinds the Read/Write service handlers
//! exercise, plus an `Array` variant so `Value` attributes of array-typed
//! nodes still round-trip.

use crate::node_id::NodeId;
use crate::status_code::StatusCode;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Variant {
    #[default]
    Empty,
    Boolean(bool),
    Int32(i32),
    UInt32(u32),
    Double(f64),
    String(String),
    NodeId(Box<NodeId>),
    StatusCode(StatusCode),
    Array(Vec<Variant>),
}

impl From<bool> for Variant {
    fn from(v: bool) -> Self {
        Variant::Boolean(v)
    }
}
impl From<i32> for Variant {
    fn from(v: i32) -> Self {
        Variant::Int32(v)
    }
}
impl From<u32> for Variant {
    fn from(v: u32) -> Self {
        Variant::UInt32(v)
    }
}
impl From<f64> for Variant {
    fn from(v: f64) -> Self {
        Variant::Double(v)
    }
}
impl From<String> for Variant {
    fn from(v: String) -> Self {
        Variant::String(v)
    }
}
impl From<&str> for Variant {
    fn from(v: &str) -> Self {
        Variant::String(v.to_string())
    }
}
impl From<NodeId> for Variant {
    fn from(v: NodeId) -> Self {
        Variant::NodeId(Box::new(v))
    }
}

/// A timestamped, status-qualified value, as read from or written to a
/// node's attribute.
#[derive(Debug, Clone, Default)]
pub struct DataValue {
    pub value: Option<Variant>,
    pub status: StatusCode,
    /// Monotonic-ish source timestamp; opaque to this core beyond
    /// round-tripping it through reads and writes.
    pub source_timestamp: Option<i64>,
}

impl DataValue {
    pub fn new_good(value: impl Into<Variant>) -> Self {
        Self {
            value: Some(value.into()),
            status: StatusCode::Good,
            source_timestamp: None,
        }
    }

    pub fn new_error(status: StatusCode) -> Self {
        Self {
            value: None,
            status,
            source_timestamp: None,
        }
    }
}
