//! Authenticated identity: who is logged in and what they may do.

pub mod manager;
pub mod permissions;
pub mod signal;

pub use manager::{SessionManager, SessionState, LOGIN_FAILED_MESSAGE};
pub use permissions::{Capability, Role, UnknownCapability};
pub use signal::{SessionInvalidated, SessionSignal};
