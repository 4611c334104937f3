//! This crate contains the session and request-authentication layer of the
//! dispatch admin console, plus the UI components that sit on top of it.

pub mod services;
pub mod utils;

#[cfg(feature = "web")]
pub mod components;

pub use services::client::{ApiClient, ErrorKind, NormalizedError, Session};
pub use services::config::ConsoleConfig;
pub use services::session::{Capability, Role, SessionManager, SessionState};

#[cfg(feature = "web")]
pub use components::{use_session, LoginForm, OtpLoginForm, PermissionGate, SessionProvider};

// Paths used by the logging macros so callers don't need these crates themselves
#[doc(hidden)]
pub mod __reexports {
    pub use gloo_console;
    pub use js_sys;
    pub use tracing;
}
