//! Session Core state machine, grounded on
//! `csrc/services/bgenc/session_core.c`/`session_core_1.c` for the exact
//! transition semantics and on `async-opcua-server::session::instance`/
//! `async-opcua-client::session` for the Rust-idiomatic shape.

use opcua_core_types::{NodeId, StatusCode, UserToken};

use crate::channel_manager::{ChannelConfigIdx, ChannelId};

/// The nine states of a session's lifecycle. `closed` is reachable from
/// every non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Init,
    Creating,
    Created,
    UserActivating,
    UserActivated,
    ScActivating,
    ScOrphaned,
    Closing,
    Closed,
}

/// Crypto material kept only for secured policies; `None` policy
/// sessions carry empty vectors and skip verification.
#[derive(Debug, Clone, Default)]
pub struct SessionCrypto {
    pub nonce_client: Vec<u8>,
    pub nonce_server: Vec<u8>,
    pub pending_signature: Vec<u8>,
}

pub struct Session {
    id: u32,
    state: SessionState,
    channel: Option<ChannelId>,
    orphaned_from_config: Option<ChannelConfigIdx>,
    user: Option<UserToken>,
    session_token: Option<NodeId>,
    crypto: SessionCrypto,
    /// Set while a `ScActivating`/`UserActivating` transition is pending a
    /// collaborator round trip (signature check, authentication), so
    /// `complete_*` knows which channel to bind on success.
    pending_channel: Option<ChannelId>,
}

impl Session {
    /// `init_new_session`: a session with no channel, no user, no token.
    pub fn init(id: u32) -> Self {
        Self {
            id,
            state: SessionState::Init,
            channel: None,
            orphaned_from_config: None,
            user: None,
            session_token: None,
            crypto: SessionCrypto::default(),
            pending_channel: None,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn channel(&self) -> Option<ChannelId> {
        self.channel
    }

    pub fn user(&self) -> Option<&UserToken> {
        self.user.as_ref()
    }

    pub fn session_token(&self) -> Option<&NodeId> {
        self.session_token.as_ref()
    }

    pub fn orphaned_from_config(&self) -> Option<ChannelConfigIdx> {
        self.orphaned_from_config
    }

    /// `client_create_req`/`(server) create_req/resp pair`: binds the
    /// channel and moves directly to `Created` — the server creates a
    /// session synchronously within one request/response, so there is no
    /// observable `Creating` state server-side; the client instead calls
    /// `begin_create` first to record the outstanding request.
    pub fn begin_create(&mut self, channel: ChannelId) -> Result<(), StatusCode> {
        if self.state != SessionState::Init {
            return Err(StatusCode::BadInvalidState);
        }
        self.channel = Some(channel);
        self.state = SessionState::Creating;
        Ok(())
    }

    pub fn create_succeeded(&mut self, channel: ChannelId, token: NodeId) {
        self.channel = Some(channel);
        self.session_token = Some(token);
        self.state = SessionState::Created;
    }

    pub fn create_failed(&mut self) {
        self.channel = None;
        self.state = SessionState::Init;
    }

    /// Server-side activation guard. `same_user`
    /// compares the token on an incoming ActivateSessionRequest against
    /// `self.user`; it is `true` trivially when there is no current user
    /// (first activation).
    fn check_activation_guard(
        &self,
        channel: ChannelId,
        same_user: bool,
    ) -> Result<(), StatusCode> {
        let channel_matches = self.channel == Some(channel);
        match self.state {
            SessionState::Created => {
                if channel_matches {
                    Ok(())
                } else {
                    Err(StatusCode::BadInvalidState)
                }
            }
            SessionState::UserActivated => {
                if channel_matches && !same_user {
                    Ok(()) // user change on same channel
                } else if !channel_matches && same_user {
                    Ok(()) // channel change, orphan-less reactivation
                } else {
                    Err(StatusCode::BadInvalidState)
                }
            }
            SessionState::ScOrphaned => {
                if !channel_matches && same_user {
                    Ok(())
                } else {
                    Err(StatusCode::BadInvalidState)
                }
            }
            _ => Err(StatusCode::BadInvalidState),
        }
    }

    /// Begins activation: validates the guard and moves to the relevant
    /// transient state (`UserActivating` for a user change, `ScActivating`
    /// for a channel change / reactivation), matching
    /// `async-opcua-server::session::manager::activate_session`, which
    /// checks the channel/state combination before doing any crypto
    /// verification or calling the `UserManager` collaborator.
    pub fn begin_activate(&mut self, channel: ChannelId, same_user: bool) -> Result<(), StatusCode> {
        self.check_activation_guard(channel, same_user)?;
        self.pending_channel = Some(channel);
        self.state = if self.channel == Some(channel) {
            SessionState::UserActivating
        } else {
            SessionState::ScActivating
        };
        Ok(())
    }

    /// Completes a successful activation: binds the pending channel and
    /// user and moves to `UserActivated`.
    pub fn complete_activate(&mut self, user: UserToken) {
        debug_assert!(matches!(
            self.state,
            SessionState::UserActivating | SessionState::ScActivating
        ));
        self.channel = self.pending_channel.take();
        self.orphaned_from_config = None;
        self.user = Some(user);
        self.state = SessionState::UserActivated;
    }

    /// Aborts a pending activation (e.g. signature verification or
    /// authentication failed after `begin_activate` succeeded), leaving
    /// the session exactly as it was before `begin_activate` was called.
    pub fn abort_activate(&mut self, previous: SessionState) {
        self.pending_channel = None;
        self.state = previous;
    }

    /// Channel-loss handler entry for one session: a `userActivated`
    /// session becomes `scOrphaned`, retaining its user;
    /// anything else bound to the lost channel closes outright with
    /// `BadSecureChannelClosed`.
    pub fn on_channel_lost(&mut self, lost_channel: ChannelId, config_idx: ChannelConfigIdx) -> bool {
        if self.channel != Some(lost_channel) {
            return false;
        }
        if self.state == SessionState::UserActivated {
            self.channel = None;
            self.orphaned_from_config = Some(config_idx);
            self.state = SessionState::ScOrphaned;
        } else {
            self.close();
        }
        true
    }

    /// Terminal transition from any non-terminal state; releases every
    /// session-scoped resource.
    pub fn close(&mut self) {
        self.channel = None;
        self.orphaned_from_config = None;
        self.user = None;
        self.session_token = None;
        self.crypto = SessionCrypto::default();
        self.pending_channel = None;
        self.state = SessionState::Closed;
    }

    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closed
    }
}
