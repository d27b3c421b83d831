// Gateway module for owner access - follows the Train Station Pattern
// All external access must go through this gateway

mod gate;
mod pin;
mod service;

pub use gate::{GateEvent, GateMachine, GateState, Verdict};
pub use pin::{OwnerAccessToken, Pin};
pub use service::OwnerAccess;
