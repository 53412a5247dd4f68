//! Attribute identifiers, Part 6 Table 1, matching the numeric values the
//! teacher's generated `AttributeId` enum uses.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum AttributeId {
    NodeId = 1,
    NodeClass = 2,
    BrowseName = 3,
    DisplayName = 4,
    Description = 5,
    WriteMask = 6,
    UserWriteMask = 7,
    IsAbstract = 8,
    Symmetric = 9,
    InverseName = 10,
    ContainsNoLoops = 11,
    EventNotifier = 12,
    Value = 13,
    DataType = 14,
    ValueRank = 15,
    ArrayDimensions = 16,
    AccessLevel = 17,
    UserAccessLevel = 18,
    MinimumSamplingInterval = 19,
    Historizing = 20,
    Executable = 21,
    UserExecutable = 22,
}

impl Default for AttributeId {
    fn default() -> Self {
        AttributeId::Value
    }
}

impl AttributeId {
    pub fn from_u32(id: u32) -> Option<Self> {
        use AttributeId::*;
        Some(match id {
            1 => NodeId,
            2 => NodeClass,
            3 => BrowseName,
            4 => DisplayName,
            5 => Description,
            6 => WriteMask,
            7 => UserWriteMask,
            8 => IsAbstract,
            9 => Symmetric,
            10 => InverseName,
            11 => ContainsNoLoops,
            12 => EventNotifier,
            13 => Value,
            14 => DataType,
            15 => ValueRank,
            16 => ArrayDimensions,
            17 => AccessLevel,
            18 => UserAccessLevel,
            19 => MinimumSamplingInterval,
            20 => Historizing,
            21 => Executable,
            22 => UserExecutable,
            _ => return None,
        })
    }
}
