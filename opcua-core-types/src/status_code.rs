//! Status code taxonomy.
//!
//! Real async-opcua generates this enum from the OPC UA schema
//! (`async-opcua-codegen`, `status_code.rs` under `generated/`); that
//! generator and schema are out of scope here; this is a compact
//! hand-rolled enum that keeps the `is_good`/`is_bad`/`is_uncertain`
//! classification behavior (top two bits of the code) the generated type
//! has, restricted to the codes the session/channel/dispatch core actually
//! emits or consumes.

use std::fmt;

const SEVERITY_MASK: u32 = 0xC000_0000;
const SEVERITY_UNCERTAIN: u32 = 0x4000_0000;
const SEVERITY_BAD: u32 = 0x8000_0000;

macro_rules! status_codes {
    ($($variant:ident = $value:expr),* $(,)?) => {
        /// A result code, mirroring the Part 4 status code taxonomy.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u32)]
        pub enum StatusCode {
            $($variant = $value),*
        }

        impl StatusCode {
            /// Raw numeric code. Not wire-compatible with the OPC UA binary
            /// encoding; the codec collaborator (§6.2) owns that mapping.
            pub fn bits(self) -> u32 {
                self as u32
            }

            pub fn from_bits(bits: u32) -> Option<Self> {
                match bits {
                    $($value => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }

        impl fmt::Display for StatusCode {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Self::$variant => write!(f, stringify!($variant)),)*
                }
            }
        }
    };
}

status_codes! {
    Good = 0x0000_0000,
    Uncertain = 0x4000_0000,
    UncertainReferenceOutOfServer = 0x4080_6000,

    BadInternalError = 0x8000_0000,
    BadOutOfMemory = 0x8002_0000,
    BadInvalidArgument = 0x8003_0000,
    BadInvalidState = 0x8004_0000,
    BadNothingToDo = 0x8005_0000,
    BadTooManyOps = 0x8006_0000,
    BadNodeIdUnknown = 0x8007_0000,
    BadNodeIdInvalid = 0x8008_0000,
    BadAttributeIdInvalid = 0x8009_0000,
    BadBrowseDirectionInvalid = 0x800A_0000,
    BadNoMatch = 0x800B_0000,
    BadBrowseNameInvalid = 0x800C_0000,
    BadNoContinuationPoints = 0x800D_0000,
    BadContinuationPointInvalid = 0x800E_0000,
    BadServiceUnsupported = 0x800F_0000,
    BadSessionIdInvalid = 0x8010_0000,
    BadSessionClosed = 0x8011_0000,
    BadSessionNotActivated = 0x8012_0000,
    BadTooManySessions = 0x8013_0000,
    BadIdentityTokenInvalid = 0x8014_0000,
    BadIdentityTokenRejected = 0x8015_0000,
    BadUserAccessDenied = 0x8016_0000,
    BadNotWritable = 0x8017_0000,
    BadSecureChannelClosed = 0x8018_0000,
    BadSecureChannelIdInvalid = 0x8019_0000,
    BadTimeout = 0x801A_0000,
    BadEncodingError = 0x801B_0000,
    BadDecodingError = 0x801C_0000,
    BadRequestInterrupted = 0x801D_0000,
    BadTooManyMatches = 0x801E_0000,
    BadQueryTooComplex = 0x801F_0000,
    BadRequestHeaderInvalid = 0x8020_0000,
    BadRequestTimeout = 0x8021_0000,
    BadUnknownResponse = 0x8022_0000,
    BadTcpEndpointUrlInvalid = 0x8023_0000,
}

impl StatusCode {
    pub fn is_good(self) -> bool {
        self.bits() & SEVERITY_MASK == 0
    }

    pub fn is_uncertain(self) -> bool {
        self.bits() & SEVERITY_MASK == SEVERITY_UNCERTAIN
    }

    pub fn is_bad(self) -> bool {
        self.bits() & SEVERITY_MASK == SEVERITY_BAD
    }
}

impl Default for StatusCode {
    fn default() -> Self {
        StatusCode::Good
    }
}
