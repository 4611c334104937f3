//! Utility Functions and Cross-Cutting Concerns
//!
//! - **console_macros**: logging macros that write to the browser console on
//!   wasm32 and to `tracing` everywhere else

pub mod console_macros;
