// Request-authentication layer for the dispatch backend
//
// This module provides:
// - Persistent credential storage (tokens + session snapshot)
// - The request pipeline that attaches bearer tokens and normalizes failures
// - Single-flight access token refresh
// - Typed wrappers for the credential-issuing endpoints

pub mod api_client;
pub mod auth;
pub mod credential_store;
pub mod error_normalizer;
pub mod errors;
pub mod storage;
pub mod token_refresh;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use api_client::ApiClient;
pub use auth::{is_credential_issuing, CREDENTIAL_ISSUING_PATHS};
pub use credential_store::CredentialStore;
pub use error_normalizer::{normalize, ErrorBody};
pub use errors::{ClientResult, ErrorKind, NormalizedError, TransportError};
pub use storage::{default_storage, BrowserStorage, KeyValueStorage, MemoryStorage};
pub use token_refresh::{RefreshError, TokenRefresher};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, ReqwestTransport};
pub use types::{CredentialPair, LoginResponse, OtpChallenge, Session, UserId};
