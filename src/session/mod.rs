/// Session management module - Gateway

mod state;
mod store;
mod validation;

pub use state::{Identity, Profile, Session};
pub use store::SessionStore;
pub use validation::{is_strong_password, validate_credentials, validate_password_change};
