//! Session Manager, grounded on
//! `async-opcua-server::session::manager::SessionManager` for the registry
//! shape and on `csrc/services/bgenc/session_mgr.c` for the orchestration
//! sequence (header decode -> request-handle validation -> session
//! validation -> service body -> response header population is realized
//! one level up, in the dispatcher; this owns the session registry itself
//! plus the create/activate/close request handling that mutates it).

use hashbrown::HashMap;
use log::{error, info, warn};
use rand::RngCore;

use opcua_core_types::{
    ActivateSessionRequest, ActivateSessionResponse, CloseSessionRequest, CloseSessionResponse,
    CreateSessionRequest, CreateSessionResponse, IdentityToken, NodeId, ResponseHeader,
    StatusCode, UserToken,
};

use crate::channel_manager::{ChannelConfigIdx, ChannelId};
use crate::limits::RuntimeLimits;
use crate::security::UserManager;

use super::state::{Session, SessionState};

fn random_session_token() -> NodeId {
    let mut buf = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut buf);
    NodeId::new(0, buf.to_vec())
}

/// A client-side session awaiting its channel to connect before the
/// `CreateSessionRequest` can actually be sent
/// (`client_async_activate_new_session_*`).
struct PendingClientActivation {
    session_id: u32,
    config_idx: ChannelConfigIdx,
    user: IdentityToken,
}

pub struct SessionManager {
    limits: RuntimeLimits,
    sessions: HashMap<u32, Session>,
    /// `sessionToken -> sessionId`, so activation/close can look a session
    /// up the way the wire protocol addresses it: only one session per
    /// sessionToken.
    by_token: HashMap<NodeId, u32>,
    next_id: u32,
    awaiting_channel: Vec<PendingClientActivation>,
}

impl SessionManager {
    pub fn new(limits: RuntimeLimits) -> Self {
        Self {
            limits,
            sessions: HashMap::new(),
            by_token: HashMap::new(),
            next_id: 0,
            awaiting_channel: Vec::new(),
        }
    }

    pub fn get(&self, id: u32) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Session> {
        self.sessions.get_mut(&id)
    }

    pub fn find_by_token(&self, token: &NodeId) -> Option<u32> {
        self.by_token.get(token).copied()
    }

    /// `init_new_session`: a fresh session id, or `None` at capacity.
    pub fn init_new_session(&mut self) -> Option<u32> {
        if self.sessions.len() >= self.limits.max_sessions {
            return None;
        }
        self.next_id += 1;
        let id = self.next_id;
        self.sessions.insert(id, Session::init(id));
        Some(id)
    }

    /// Server-side `CreateSessionRequest` handling: publishes a fresh, unguessable
    /// session token and a server-revised timeout bounded to
    /// `[min, max]_session_timeout_ms`.
    pub fn create_session_req_and_resp(
        &mut self,
        channel: ChannelId,
        req: &CreateSessionRequest,
    ) -> Result<CreateSessionResponse, StatusCode> {
        let Some(id) = self.init_new_session() else {
            return Err(StatusCode::BadTooManySessions);
        };
        let token = random_session_token();
        let revised_timeout = (req.requested_session_timeout as u64)
            .clamp(self.limits.min_session_timeout_ms, self.limits.max_session_timeout_ms);

        let session = self.sessions.get_mut(&id).expect("just inserted");
        session.create_succeeded(channel, token.clone());
        self.by_token.insert(token.clone(), id);

        info!("created session {id} on channel {channel}, token {token}");

        Ok(CreateSessionResponse {
            response_header: ResponseHeader::new_good(&req.request_header),
            session_id: NodeId::new(1, id),
            authentication_token: token,
            revised_session_timeout: revised_timeout as f64,
            server_nonce: Vec::new(),
            server_endpoints: Vec::new(),
            server_signature: Vec::new(),
        })
    }

    /// Server-side `ActivateSessionRequest` handling. The caller has
    /// already resolved `channel` from the delivering secure channel;
    /// `user_manager.authenticate` is invoked between `begin_activate` and
    /// `complete_activate`, matching
    /// `async-opcua-server::session::manager::activate_session`'s
    /// sequence of channel/state check, then signature/credential
    /// verification, then the state mutation.
    pub fn activate_session_req_and_resp(
        &mut self,
        channel: ChannelId,
        endpoint_idx: u32,
        req: &ActivateSessionRequest,
        user_manager: &dyn UserManager,
    ) -> Result<ActivateSessionResponse, StatusCode> {
        let Some(&id) = self.by_token.get(&req.request_header.authentication_token) else {
            return Err(StatusCode::BadSessionIdInvalid);
        };
        let session = self.sessions.get_mut(&id).expect("token map is consistent");
        let previous_state = session.state();
        let current_user = session.user().cloned();
        let same_user = current_user
            .as_ref()
            .map(|u| matches_identity(u, &req.user_identity_token))
            .unwrap_or(true);

        if let Err(status) = session.begin_activate(channel, same_user) {
            error!(
                "activate_session rejected for session {id}: state {:?} channel {}",
                previous_state, channel
            );
            return Err(status);
        }

        match user_manager.authenticate(endpoint_idx, &req.user_identity_token) {
            Ok(user) => {
                let session = self.sessions.get_mut(&id).expect("still present");
                session.complete_activate(user);
                Ok(ActivateSessionResponse {
                    response_header: ResponseHeader::new_good(&req.request_header),
                    server_nonce: Vec::new(),
                })
            }
            Err(status) => {
                let session = self.sessions.get_mut(&id).expect("still present");
                session.abort_activate(previous_state);
                Err(status)
            }
        }
    }

    /// `CloseSessionRequest` handling; releases the session and its token
    /// unconditionally (`set_session_state_closed`).
    pub fn close_session_req_and_resp(
        &mut self,
        req: &CloseSessionRequest,
    ) -> Result<(CloseSessionResponse, u32), StatusCode> {
        let Some(&id) = self.by_token.get(&req.request_header.authentication_token) else {
            return Err(StatusCode::BadSessionIdInvalid);
        };
        self.close_session(id);
        info!("closed session {id}");
        Ok((
            CloseSessionResponse {
                response_header: ResponseHeader::new_good(&req.request_header),
            },
            id,
        ))
    }

    fn close_session(&mut self, id: u32) {
        if let Some(session) = self.sessions.get_mut(&id) {
            if let Some(token) = session.session_token().cloned() {
                self.by_token.remove(&token);
            }
            session.close();
        }
    }

    /// Channel-loss fan-out: every session bound to the lost channel
    /// either orphans (if activated) or closes outright.
    /// Returns the ids of sessions that closed outright, so the caller can
    /// release their continuation points and notify the application layer.
    pub fn on_channel_lost(&mut self, channel: ChannelId, config_idx: ChannelConfigIdx) -> Vec<u32> {
        let mut closed = Vec::new();
        for (id, session) in self.sessions.iter_mut() {
            if session.on_channel_lost(channel, config_idx) && session.is_closed() {
                closed.push(*id);
            }
        }
        for id in &closed {
            if let Some(session) = self.sessions.get(id) {
                if session.session_token().is_none() {
                    // token was already cleared by `close`; nothing left
                    // to unindex, but warn so stale `by_token` entries
                    // never silently accumulate if this invariant ever
                    // breaks.
                } else {
                    warn!("session {id} closed by channel loss but retained a token");
                }
            }
        }
        self.by_token.retain(|_, id| {
            self.sessions
                .get(id)
                .is_some_and(|s| !s.is_closed())
        });
        closed
    }

    pub fn check_session_expiry(&mut self, now_ms: u64, deadlines: &HashMap<u32, u64>) -> Vec<u32> {
        let mut expired = Vec::new();
        for (&id, &deadline) in deadlines {
            if deadline <= now_ms {
                if let Some(session) = self.sessions.get(&id) {
                    if !session.is_closed() {
                        expired.push(id);
                    }
                }
            }
        }
        for id in &expired {
            self.close_session(*id);
        }
        expired
    }

    /// Queues a session to be created once `config_idx`'s channel reports
    /// connected: used by a client that calls
    /// `client_async_activate_new_session` before a channel config even
    /// exists yet.
    pub fn queue_client_activation(
        &mut self,
        session_id: u32,
        config_idx: ChannelConfigIdx,
        user: IdentityToken,
    ) {
        self.awaiting_channel.push(PendingClientActivation {
            session_id,
            config_idx,
            user,
        });
    }

    /// Drains and returns the sessions queued against `config_idx` now
    /// that its channel is connected, so the caller can issue their
    /// `CreateSessionRequest`s.
    pub fn drain_ready_for_channel(&mut self, config_idx: ChannelConfigIdx) -> Vec<(u32, IdentityToken)> {
        let mut ready = Vec::new();
        self.awaiting_channel.retain(|p| {
            if p.config_idx == config_idx {
                ready.push((p.session_id, p.user.clone()));
                false
            } else {
                true
            }
        });
        ready
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

fn matches_identity(current: &UserToken, incoming: &IdentityToken) -> bool {
    // A real comparison authenticates `incoming` first and compares the
    // resulting `UserToken`s; here we only need same/different for the
    // activation guard, so anonymous never matches a non-anonymous current
    // user and vice versa, and named identities compare by name.
    match incoming {
        IdentityToken::Anonymous => current.0 == "anonymous",
        IdentityToken::UserName { user_name, .. } => &current.0 == user_name,
        IdentityToken::X509 { .. } => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opcua_core_types::RequestHeader;

    struct AlwaysAnonymous;
    impl UserManager for AlwaysAnonymous {
        fn authenticate(
            &self,
            _endpoint_idx: u32,
            _token: &IdentityToken,
        ) -> Result<UserToken, StatusCode> {
            Ok(UserToken::anonymous())
        }
        fn deallocate(&self, _user: UserToken) {}
    }

    fn create_req() -> CreateSessionRequest {
        CreateSessionRequest {
            request_header: RequestHeader::default(),
            endpoint_url: "opc.tcp://h:4841".to_string(),
            session_name: "s".to_string(),
            client_nonce: Vec::new(),
            requested_session_timeout: 60_000.0,
        }
    }

    #[test]
    fn create_activate_close_happy_path() {
        let mut mgr = SessionManager::new(RuntimeLimits::default());
        let resp = mgr.create_session_req_and_resp(7, &create_req()).unwrap();
        assert_eq!(mgr.session_count(), 1);

        let activate_req = ActivateSessionRequest {
            request_header: RequestHeader {
                authentication_token: resp.authentication_token.clone(),
                ..Default::default()
            },
            client_signature: Vec::new(),
            locale_ids: Vec::new(),
            user_identity_token: IdentityToken::Anonymous,
            user_token_signature: Vec::new(),
        };
        mgr.activate_session_req_and_resp(7, 1, &activate_req, &AlwaysAnonymous)
            .unwrap();
        assert_eq!(
            mgr.get(1).unwrap().state(),
            SessionState::UserActivated
        );

        let close_req = CloseSessionRequest {
            request_header: RequestHeader {
                authentication_token: resp.authentication_token,
                ..Default::default()
            },
            delete_subscriptions: true,
        };
        let (_, id) = mgr.close_session_req_and_resp(&close_req).unwrap();
        assert_eq!(id, 1);
        assert!(mgr.get(1).unwrap().is_closed());
        assert!(mgr.find_by_token(&NodeId::null()).is_none());
    }

    #[test]
    fn channel_loss_orphans_then_allows_reactivation_on_new_channel() {
        let mut mgr = SessionManager::new(RuntimeLimits::default());
        let resp = mgr.create_session_req_and_resp(7, &create_req()).unwrap();
        let activate_req = ActivateSessionRequest {
            request_header: RequestHeader {
                authentication_token: resp.authentication_token.clone(),
                ..Default::default()
            },
            client_signature: Vec::new(),
            locale_ids: Vec::new(),
            user_identity_token: IdentityToken::Anonymous,
            user_token_signature: Vec::new(),
        };
        mgr.activate_session_req_and_resp(7, 1, &activate_req, &AlwaysAnonymous)
            .unwrap();

        let closed = mgr.on_channel_lost(7, 3);
        assert!(closed.is_empty());
        assert_eq!(mgr.get(1).unwrap().state(), SessionState::ScOrphaned);

        let reactivate_req = ActivateSessionRequest {
            request_header: RequestHeader {
                authentication_token: resp.authentication_token,
                ..Default::default()
            },
            client_signature: Vec::new(),
            locale_ids: Vec::new(),
            user_identity_token: IdentityToken::Anonymous,
            user_token_signature: Vec::new(),
        };
        mgr.activate_session_req_and_resp(9, 1, &reactivate_req, &AlwaysAnonymous)
            .unwrap();
        assert_eq!(mgr.get(1).unwrap().channel(), Some(9));
    }

    #[test]
    fn too_many_sessions_is_rejected() {
        let mut mgr = SessionManager::new(RuntimeLimits {
            max_sessions: 1,
            ..Default::default()
        });
        mgr.create_session_req_and_resp(7, &create_req()).unwrap();
        assert_eq!(
            mgr.create_session_req_and_resp(8, &create_req()),
            Err(StatusCode::BadTooManySessions)
        );
    }
}
