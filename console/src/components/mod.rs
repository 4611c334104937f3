//! User Interface Components
//!
//! Dioxus glue between the session layer and the console's pages:
//!
//! - **session_provider**: restores the session and shares it through context
//! - **login_form**: email/password sign-in
//! - **otp_login_form**: phone sign-in with a one-time code
//! - **permission_gate**: capability-based rendering
//! - **form_input**: labelled input fields

pub mod form_input;
pub mod login_form;
pub mod otp_login_form;
pub mod permission_gate;
pub mod session_provider;

pub use form_input::{FormInput, InputKind};
pub use login_form::LoginForm;
pub use otp_login_form::OtpLoginForm;
pub use permission_gate::PermissionGate;
pub use session_provider::{use_session, SessionContext, SessionProvider};
