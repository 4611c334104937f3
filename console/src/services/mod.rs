//! Infrastructure Services
//!
//! This module provides the session and request-authentication layer of the
//! dispatch console:
//!
//! - **client**: HTTP pipeline with bearer attachment, token refresh and error normalization
//! - **session**: Session state machine, permission model and invalidation signal
//! - **config**: Configuration and storage key settings
//! - **errors**: Storage error types
//!
//! The services are designed to be WASM-first, using browser APIs and async traits
//! without Send/Sync bounds for compatibility.

pub mod client;
pub mod config;
pub mod errors;
pub mod session;
