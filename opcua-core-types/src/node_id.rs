//! Node identifiers, grounded on `async-opcua-types::node_id`.
//!
//! Trimmed: no binary/XML/JSON encoding (the codec is an external
//! collaborator), and `Guid`/`ByteString` identifiers are represented
//! with plain `String`/`Vec<u8>` rather than dedicated wrapper types,
//! since nothing in this core inspects their internal structure.

use std::fmt;
use std::str::FromStr;

/// The four OPC UA identifier kinds (Part 3 §8.2.1).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    Numeric(u32),
    String(String),
    Guid(String),
    ByteString(Vec<u8>),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(v) => write!(f, "i={v}"),
            Identifier::String(v) => write!(f, "s={v}"),
            Identifier::Guid(v) => write!(f, "g={v}"),
            Identifier::ByteString(v) => write!(f, "b={}", hex(v)),
        }
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

impl From<u32> for Identifier {
    fn from(v: u32) -> Self {
        Identifier::Numeric(v)
    }
}

impl From<&str> for Identifier {
    fn from(v: &str) -> Self {
        Identifier::String(v.to_string())
    }
}

impl From<String> for Identifier {
    fn from(v: String) -> Self {
        Identifier::String(v)
    }
}

/// An identifier for a node in the address space: a namespace index plus
/// one of four identifier kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub namespace: u16,
    pub identifier: Identifier,
}

impl NodeId {
    pub fn new(namespace: u16, identifier: impl Into<Identifier>) -> Self {
        Self {
            namespace,
            identifier: identifier.into(),
        }
    }

    /// `ns=0;i=0`, the sentinel "no node" identifier.
    pub fn null() -> Self {
        Self::new(0, 0u32)
    }

    pub fn is_null(&self) -> bool {
        self.namespace == 0 && matches!(self.identifier, Identifier::Numeric(0))
    }

    /// `ns=0;i=85`, the well-known `Objects` folder, used by
    /// TranslateBrowsePaths as the mandatory starting node.
    pub fn objects_folder() -> Self {
        Self::new(0, 85u32)
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace != 0 {
            write!(f, "ns={};{}", self.namespace, self.identifier)
        } else {
            write!(f, "{}", self.identifier)
        }
    }
}

impl FromStr for NodeId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut namespace = 0u16;
        let mut rest = s;
        if let Some(stripped) = s.strip_prefix("ns=") {
            let (ns, tail) = stripped.split_once(';').ok_or(())?;
            namespace = ns.parse().map_err(|_| ())?;
            rest = tail;
        }
        if rest.len() < 2 {
            return Err(());
        }
        let (kind, value) = rest.split_at(2);
        let identifier = match kind {
            "i=" => Identifier::Numeric(value.parse().map_err(|_| ())?),
            "s=" => Identifier::String(value.to_string()),
            "g=" => Identifier::Guid(value.to_string()),
            "b=" => Identifier::ByteString(value.as_bytes().to_vec()),
            _ => return Err(()),
        };
        Ok(NodeId::new(namespace, identifier))
    }
}
