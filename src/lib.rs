pub mod access;
pub mod app;
pub mod cli;
pub mod constants;
pub mod gateway;
pub mod i18n;
pub mod session;
pub mod storage;
pub mod utils;

pub use access::{GateState, OwnerAccess};
pub use app::{load_config, AppState, Config};
pub use gateway::{Backend, HttpGateway};
pub use session::{Session, SessionStore};
pub use utils::PartnerError;
