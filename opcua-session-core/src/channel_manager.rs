//! Channel Manager, grounded on `csrc/services/bgenc/channel_mgr.c` for
//! the exact arbitration rules, and on
//! `async-opcua-server::session::manager`/`async-opcua-client::transport`
//! for the Rust-idiomatic shape: a plain owned registry mutated through
//! methods that uphold the invariants, no internal locking.

use hashbrown::HashMap;
use log::{info, warn};

use opcua_core_types::IndexingType;

use crate::limits::RuntimeLimits;

pub type ChannelId = IndexingType;
pub type ChannelConfigIdx = IndexingType;
pub type EndpointConfigIdx = IndexingType;

/// Security policy URI, opaque beyond equality/logging here; the real
/// negotiation and cipher suite selection is the crypto collaborator's
/// job.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SecurityPolicy(pub String);

impl SecurityPolicy {
    pub fn none() -> Self {
        SecurityPolicy("http://opcfoundation.org/UA/SecurityPolicy#None".to_string())
    }
}

/// A connected secure channel.
#[derive(Debug, Clone)]
pub struct Channel {
    pub config_idx: ChannelConfigIdx,
    pub endpoint_idx: Option<EndpointConfigIdx>,
    pub connected_at: u64,
    pub security_policy: SecurityPolicy,
}

#[derive(Default)]
pub struct ChannelManager {
    limits_max_channels: usize,
    /// `configIdx -> channel`, partial: at most one connected channel per
    /// config (invariant 1).
    connected: HashMap<ChannelConfigIdx, ChannelId>,
    /// The inverse map, so `channel_lost` can find the config to clear.
    by_channel: HashMap<ChannelId, Channel>,
    /// Client-side connect intents not yet promoted to `connected`.
    connecting: HashMap<ChannelConfigIdx, ()>,
    closing_all: bool,
}

impl ChannelManager {
    pub fn new(limits: &RuntimeLimits) -> Self {
        Self {
            limits_max_channels: limits.max_channels,
            ..Default::default()
        }
    }

    fn total_channel_capacity(&self) -> usize {
        self.limits_max_channels
    }

    /// `cli_open_secure_channel`: idempotent if a connect is already in
    /// flight for this config; otherwise reserves capacity and asks the
    /// transport to connect.
    pub fn client_open(&mut self, config_idx: ChannelConfigIdx) -> bool {
        if self.connecting.contains_key(&config_idx) {
            return true;
        }
        if self.connected.contains_key(&config_idx) {
            return false;
        }
        let in_use = self.connecting.len() + self.connected.len();
        if in_use >= self.total_channel_capacity() {
            return false;
        }
        self.connecting.insert(config_idx, ());
        true
    }

    /// `srv_new_secure_channel`: registers a server-accepted channel if
    /// the channel is not already connected and the config has no binding.
    pub fn server_new(
        &mut self,
        endpoint_idx: EndpointConfigIdx,
        config_idx: ChannelConfigIdx,
        channel: ChannelId,
        connected_at: u64,
        security_policy: SecurityPolicy,
    ) -> bool {
        if self.by_channel.contains_key(&channel) || self.connected.contains_key(&config_idx) {
            return false;
        }
        self.connected.insert(config_idx, channel);
        self.by_channel.insert(
            channel,
            Channel {
                config_idx,
                endpoint_idx: Some(endpoint_idx),
                connected_at,
                security_policy,
            },
        );
        info!("channel {channel} connected (server, config {config_idx})");
        true
    }

    /// `cli_set_connected`: promotes a pending client connect intent.
    pub fn client_set_connected(
        &mut self,
        config_idx: ChannelConfigIdx,
        channel: ChannelId,
        connected_at: u64,
        security_policy: SecurityPolicy,
    ) -> bool {
        if self.by_channel.contains_key(&channel) {
            return false;
        }
        if self.connecting.remove(&config_idx).is_none() {
            return false;
        }
        self.connected.insert(config_idx, channel);
        self.by_channel.insert(
            channel,
            Channel {
                config_idx,
                endpoint_idx: None,
                connected_at,
                security_policy,
            },
        );
        info!("channel {channel} connected (client, config {config_idx})");
        true
    }

    pub fn client_connect_timeout(&mut self, config_idx: ChannelConfigIdx) -> bool {
        self.connecting.remove(&config_idx).is_some()
    }

    /// Whether `config_idx` has an outstanding client-initiated connect
    /// (i.e. the transport event about to arrive for it is
    /// `client_set_connected`, not `server_new`).
    pub fn is_connecting(&self, config_idx: ChannelConfigIdx) -> bool {
        self.connecting.contains_key(&config_idx)
    }

    /// Marks the channel as disconnecting; no state is removed until
    /// `channel_lost` arrives.
    pub fn close(&mut self, _channel: ChannelId) {
        // Bookkeeping-only: the actual close command is issued by the
        // caller to the `Transport` collaborator. Nothing to mutate here
        // until the transport confirms with `channel_lost`.
    }

    /// `close_all`: returns whether anything was actually closing.
    pub fn close_all(&mut self) -> bool {
        self.closing_all = true;
        !self.by_channel.is_empty()
    }

    /// Returns the list of channel ids to ask the transport to close, for
    /// every currently-connected channel.
    pub fn connected_channel_ids(&self) -> Vec<ChannelId> {
        self.by_channel.keys().copied().collect()
    }

    /// `channel_lost`: releases all bindings for `channel`. Idempotent:
    /// calling this twice for the same channel is a no-op the second time.
    ///
    /// Returns `true` iff this call should also fire
    /// `last_connected_channel_lost` (closing-all in progress and this was
    /// the last connected channel).
    pub fn channel_lost(&mut self, channel: ChannelId) -> bool {
        let Some(entry) = self.by_channel.remove(&channel) else {
            return false;
        };
        self.connected.remove(&entry.config_idx);
        warn!("channel {channel} lost (config {})", entry.config_idx);
        self.closing_all && self.by_channel.is_empty()
    }

    pub fn is_connected(&self, channel: ChannelId) -> bool {
        self.by_channel.contains_key(&channel)
    }

    pub fn is_client(&self, channel: ChannelId) -> bool {
        self.by_channel
            .get(&channel)
            .is_some_and(|c| c.endpoint_idx.is_none())
    }

    pub fn get_info(&self, channel: ChannelId) -> Option<&Channel> {
        self.by_channel.get(&channel)
    }

    pub fn get_endpoint(&self, channel: ChannelId) -> Option<EndpointConfigIdx> {
        self.by_channel.get(&channel).and_then(|c| c.endpoint_idx)
    }

    pub fn get_security_policy(&self, channel: ChannelId) -> Option<&SecurityPolicy> {
        self.by_channel.get(&channel).map(|c| &c.security_policy)
    }

    pub fn get_connection_time(&self, channel: ChannelId) -> Option<u64> {
        self.by_channel.get(&channel).map(|c| c.connected_at)
    }

    pub fn channel_for_config(&self, config_idx: ChannelConfigIdx) -> Option<ChannelId> {
        self.connected.get(&config_idx).copied()
    }
}
