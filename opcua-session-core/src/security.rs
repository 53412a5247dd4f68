//! The authentication collaborator, grounded on
//! `async-opcua-server::identity_token`'s `IdentityToken` handling and the
//! `UserManager` trait shape from `async-opcua-server::session::manager`.
//! Signature verification and certificate validation belong to the crypto
//! collaborator; this trait covers only turning a decoded identity token
//! into an authenticated (or rejected) user.

use opcua_core_types::{IdentityToken, StatusCode, UserToken};

/// Authenticates an incoming `ActivateSessionRequest`'s identity token
/// against whatever user store the embedding application maintains.
pub trait UserManager {
    /// `endpoint_idx` selects which endpoint's configured user token
    /// policies apply: activation is endpoint-scoped.
    fn authenticate(
        &self,
        endpoint_idx: u32,
        token: &IdentityToken,
    ) -> Result<UserToken, StatusCode>;

    /// Releases any resource the `UserManager` itself attached to `user`
    /// (e.g. an impersonation handle) once its owning session closes.
    /// Default no-op, since most embeddings keep `UserToken` itself
    /// self-contained.
    fn deallocate(&self, _user: UserToken) {}
}
