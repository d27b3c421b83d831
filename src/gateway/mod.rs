// Gateway module for backend access - follows the Train Station Pattern
// All external access must go through this gateway

mod http;
mod traits;
mod types;

pub use http::HttpGateway;
#[cfg(test)]
pub use traits::MockBackend;
pub use traits::Backend;
pub use types::{
    Ack, Credentials, DataReply, Envelope, GatewayError, IdentityReply, IssuedReply, LoginReply,
    PasswordChange, Reply, Statement, UserRecord,
};
