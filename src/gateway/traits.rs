use async_trait::async_trait;

use super::types::{
    Ack, Credentials, DataReply, GatewayError, IdentityReply, IssuedReply, LoginReply,
    PasswordChange, Reply, Statement,
};
use crate::access::{OwnerAccessToken, Pin};
use crate::i18n::Locale;

/// Every backend endpoint the client talks to
///
/// `token` is the session bearer credential; it is attached per call and never kept
/// by the implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Backend: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<Reply<LoginReply>, GatewayError>;

    /// Any 2xx counts as success; the body is ignored
    async fn logout(&self, token: &str) -> Result<(), GatewayError>;

    async fn fetch_user(&self, token: &str) -> Result<Reply<IdentityReply>, GatewayError>;

    async fn change_locale(&self, token: &str, locale: &Locale)
        -> Result<Reply<Ack>, GatewayError>;

    async fn change_theme(&self, token: &str, dark_mode: bool) -> Result<Reply<Ack>, GatewayError>;

    async fn change_password(
        &self,
        token: &str,
        change: &PasswordChange,
    ) -> Result<Reply<Ack>, GatewayError>;

    /// `success: false` means the account has no owner PIN
    async fn owner_pin_exists(&self, token: &str) -> Result<Reply<Ack>, GatewayError>;

    async fn check_owner_token(
        &self,
        token: &str,
        owner: OwnerAccessToken,
    ) -> Result<Reply<Ack>, GatewayError>;

    async fn enter_owner_pin(&self, token: &str, pin: &Pin)
        -> Result<Reply<IssuedReply>, GatewayError>;

    async fn set_owner_pin(&self, token: &str, pin: &Pin) -> Result<Reply<IssuedReply>, GatewayError>;

    async fn fetch_statement(
        &self,
        token: &str,
        statement: &Statement,
        owner: OwnerAccessToken,
    ) -> Result<Reply<DataReply>, GatewayError>;
}
