//! Runtime limits, grounded on `async-opcua-server::config::ServerLimits`
//! (`max_sessions`, `max_session_timeout_ms`, ...), trimmed to the fields
//! this core consults directly.

/// Bounds the core enforces on its own bookkeeping; everything else
/// (message size, subscription counts, ...) belongs to collaborators this
/// core doesn't own.
#[derive(Debug, Clone)]
pub struct RuntimeLimits {
    pub max_channels: usize,
    pub max_sessions: usize,
    pub max_continuation_points_per_session: usize,
    pub min_session_timeout_ms: u64,
    pub max_session_timeout_ms: u64,
    pub max_register_nodes: usize,
    pub max_browse_continuation_points: usize,
}

impl Default for RuntimeLimits {
    fn default() -> Self {
        // Matches `async-opcua-server::config::ServerLimits` defaults
        // where it states them explicitly.
        Self {
            max_channels: 100,
            max_sessions: 100,
            max_continuation_points_per_session: 10,
            min_session_timeout_ms: 10_000,
            max_session_timeout_ms: 3_600_000,
            max_register_nodes: 1_000,
            max_browse_continuation_points: 1_000,
        }
    }
}
