//! Service Dispatcher, grounded on
//! `csrc/services/bgenc/service_mgr.c`'s classify/validate/invoke
//! sequence and on `async-opcua-server::session::manager`'s
//! `SessionManager::handle_request` for the Rust-idiomatic orchestration:
//! session-treatment requests mutate the session registry directly,
//! session-service requests are validated against a bound, activated
//! session before the matching handler runs, and anything else becomes a
//! `ServiceFault`.

use opcua_core_types::{
    ApplicationDescription, RequestHeader, RequestMessage, ResponseMessage, ServiceFault,
    StatusCode, UserToken,
};

use crate::address_space::AddressSpace;
use crate::app_callback::ApplicationCallback;
use crate::channel_manager::{ChannelConfigIdx, ChannelId, ChannelManager, SecurityPolicy};
use crate::continuation_points::ContinuationPointRegistry;
use crate::limits::RuntimeLimits;
use crate::security::UserManager;
use crate::services::{
    handle_browse, handle_browse_next, handle_delete_subscriptions, handle_find_servers,
    handle_read, handle_register_nodes, handle_translate_browse_paths, handle_unregister_nodes,
    handle_write,
};
use crate::session::{SessionManager, SessionState};
use crate::transport::TransportEvent;

fn fault(header: &RequestHeader, status: StatusCode) -> ResponseMessage {
    ResponseMessage::ServiceFault(Box::new(ServiceFault::new(header, status)))
}

pub struct Dispatcher {
    pub channels: ChannelManager,
    pub sessions: SessionManager,
    pub continuations: ContinuationPointRegistry,
    limits: RuntimeLimits,
}

impl Dispatcher {
    pub fn new(limits: RuntimeLimits) -> Self {
        Self {
            channels: ChannelManager::new(&limits),
            sessions: SessionManager::new(limits.clone()),
            continuations: ContinuationPointRegistry::new(limits.max_continuation_points_per_session),
            limits,
        }
    }

    /// Folds a transport-reported event into the channel and session
    /// registries; returns the ids of sessions that closed outright as a
    /// result (so the caller can notify the application and release any
    /// further per-session resources it owns).
    pub fn handle_transport_event(&mut self, event: TransportEvent) -> Vec<u32> {
        match event {
            TransportEvent::ChannelConnected {
                config_idx,
                channel,
                endpoint_idx,
                connected_at,
                security_policy,
            } => {
                if self.channels.is_connecting(config_idx) {
                    self.channels
                        .client_set_connected(config_idx, channel, connected_at, security_policy);
                } else {
                    self.channels.server_new(
                        endpoint_idx.unwrap_or(0),
                        config_idx,
                        channel,
                        connected_at,
                        security_policy,
                    );
                }
                Vec::new()
            }
            TransportEvent::ChannelLost { channel } => {
                let config_idx: ChannelConfigIdx =
                    self.channels.get_info(channel).map(|c| c.config_idx).unwrap_or(0);
                self.channels.channel_lost(channel);
                let closed = self.sessions.on_channel_lost(channel, config_idx);
                for id in &closed {
                    self.continuations.release_session(*id);
                }
                closed
            }
            TransportEvent::ConnectTimeout { config_idx } => {
                self.channels.client_connect_timeout(config_idx);
                Vec::new()
            }
            TransportEvent::Message { .. } => Vec::new(),
        }
    }

    /// Server-side request dispatch. `addr` and `users` are borrowed only
    /// for the duration of one call, matching the single-threaded
    /// cooperative model: no lock is held across calls.
    pub fn dispatch_request(
        &mut self,
        channel: ChannelId,
        endpoint_idx: u32,
        request: RequestMessage,
        addr: &mut dyn AddressSpace,
        users: &dyn UserManager,
        own_app: &ApplicationDescription,
        callback: &dyn ApplicationCallback,
    ) -> ResponseMessage {
        match request {
            RequestMessage::FindServers(req) => handle_find_servers(own_app, &req).into(),
            RequestMessage::CreateSession(req) => {
                match self.sessions.create_session_req_and_resp(channel, &req) {
                    Ok(resp) => resp.into(),
                    Err(status) => fault(&req.request_header, status),
                }
            }
            RequestMessage::ActivateSession(req) => match self
                .sessions
                .activate_session_req_and_resp(channel, endpoint_idx, &req, users)
            {
                Ok(resp) => resp.into(),
                Err(status) => fault(&req.request_header, status),
            },
            RequestMessage::CloseSession(req) => match self.sessions.close_session_req_and_resp(&req) {
                Ok((resp, id)) => {
                    self.continuations.release_session(id);
                    resp.into()
                }
                Err(status) => fault(&req.request_header, status),
            },
            other => self.dispatch_session_service(channel, other, addr, callback),
        }
    }

    /// Runs a Write as a local-service call on behalf of the application
    /// itself, bypassing the `AccessLevel`/authorization checks a
    /// channel-originated Write is subject to. No session binding is
    /// involved, so this does not go through `dispatch_session_service`.
    pub fn local_write(
        &self,
        addr: &mut dyn AddressSpace,
        req: &opcua_core_types::WriteRequest,
        callback: &dyn ApplicationCallback,
    ) -> opcua_core_types::WriteResponse {
        handle_write(addr, &UserToken::anonymous(), req, true, callback)
    }

    fn dispatch_session_service(
        &mut self,
        channel: ChannelId,
        request: RequestMessage,
        addr: &mut dyn AddressSpace,
        callback: &dyn ApplicationCallback,
    ) -> ResponseMessage {
        let header = request.request_header().clone();
        let Some(session_id) = self.sessions.find_by_token(&header.authentication_token) else {
            return fault(&header, StatusCode::BadSessionIdInvalid);
        };
        let Some(session) = self.sessions.get(session_id) else {
            return fault(&header, StatusCode::BadSessionIdInvalid);
        };
        if session.state() != SessionState::UserActivated || session.channel() != Some(channel) {
            return fault(&header, StatusCode::BadSessionNotActivated);
        }
        let user = session.user().cloned().unwrap_or_else(UserToken::anonymous);

        match request {
            RequestMessage::Read(req) => handle_read(addr, &user, &req).into(),
            RequestMessage::Write(req) => handle_write(addr, &user, &req, false, callback).into(),
            RequestMessage::Browse(req) => {
                handle_browse(addr, &mut self.continuations, session_id, &req).into()
            }
            RequestMessage::BrowseNext(req) => {
                handle_browse_next(addr, &mut self.continuations, session_id, &req).into()
            }
            RequestMessage::TranslateBrowsePathsToNodeIds(req) => {
                handle_translate_browse_paths(addr, &req).into()
            }
            RequestMessage::RegisterNodes(req) => {
                handle_register_nodes(self.limits.max_register_nodes, &req).into()
            }
            RequestMessage::UnregisterNodes(req) => handle_unregister_nodes(&req).into(),
            RequestMessage::DeleteSubscriptions(req) => handle_delete_subscriptions(&req).into(),
            _ => fault(&header, StatusCode::BadServiceUnsupported),
        }
    }
}
