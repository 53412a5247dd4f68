//! Identity tokens and authenticated user handles, grounded on
//! `async-opcua-server::identity_token::IdentityToken`. The real type
//! wraps decoded `ExtensionObject` variants (`AnonymousIdentityToken`,
//! `UserNameIdentityToken`, `X509IdentityToken`); since extension-object
//! decoding is the codec collaborator's job here, this keeps only the
//! already-decoded shapes the session layer and `UserManager` (§6.4) act
//! on.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityToken {
    Anonymous,
    UserName { user_name: String, password: Vec<u8> },
    X509 { certificate_der: Vec<u8> },
}

/// An authenticated user, opaque to everything except the `AddressSpace`
/// and `UserManager` collaborators that issued and consult it. `PartialEq`
/// lets the session core compare "same user as current" per the
/// activation guard table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserToken(pub String);

impl UserToken {
    pub fn anonymous() -> Self {
        UserToken("anonymous".to_string())
    }
}
