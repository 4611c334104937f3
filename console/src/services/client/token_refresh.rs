//! Access token refresh with concurrent-refresh coalescing.
//!
//! Every refresh runs behind one async guard. A caller that gets the guard
//! after someone else already replaced the access token it was rejected with
//! gets the replacement without another network call, so a burst of 401s for
//! the same expired token costs exactly one refresh.

use std::sync::Arc;

use serde_json::json;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use super::auth::REFRESH_PATH;
use super::credential_store::CredentialStore;
use super::errors::TransportError;
use super::transport::{ApiRequest, HttpTransport};
use super::types::{CredentialPair, RefreshResponse};
use crate::services::errors::StorageError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    #[error("No refresh token is stored")]
    MissingRefreshToken,

    #[error("Refresh rejected with status {status}")]
    Rejected { status: u16 },

    #[error("Refresh response did not contain an access token")]
    MalformedResponse,

    #[error("Session ended while the refresh was in flight")]
    SessionEnded,

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Could not persist refreshed credentials: {0}")]
    Storage(#[from] StorageError),
}

pub struct TokenRefresher {
    transport: Arc<dyn HttpTransport>,
    store: CredentialStore,
    guard: Mutex<()>,
}

impl TokenRefresher {
    pub fn new(transport: Arc<dyn HttpTransport>, store: CredentialStore) -> Self {
        Self {
            transport,
            store,
            guard: Mutex::new(()),
        }
    }

    /// Obtain a usable access token after `rejected` was refused by the backend.
    ///
    /// On success the new token is already persisted. On failure nothing is
    /// cleared here; tearing the session down is the caller's decision.
    ///
    /// The store is read again once the backend answers. A refreshed pair is
    /// only written over the pair it was minted from: if the session was
    /// cleared meanwhile the refresh fails, and if a login replaced it the
    /// new session's access token is returned untouched.
    #[instrument(skip_all)]
    pub async fn refresh(&self, rejected: Option<&str>) -> Result<String, RefreshError> {
        let _singleflight = self.guard.lock().await;

        let current = self.store.get().ok_or(RefreshError::MissingRefreshToken)?;
        if rejected != Some(current.access_token.as_str()) {
            debug!("Access token was already replaced by a concurrent refresh");
            return Ok(current.access_token);
        }

        let request =
            ApiRequest::post(REFRESH_PATH).with_body(json!({ "refresh": current.refresh_token }));
        let sent = self.transport.send(&request).await;

        match self.store.get() {
            None => return Err(RefreshError::SessionEnded),
            Some(stored) if stored.refresh_token != current.refresh_token => {
                debug!("Session was replaced while the refresh was in flight");
                return Ok(stored.access_token);
            }
            Some(_) => {}
        }

        let response = sent?;
        if !response.is_success() {
            return Err(RefreshError::Rejected {
                status: response.status,
            });
        }

        let refreshed: RefreshResponse =
            serde_json::from_value(response.body).map_err(|_| RefreshError::MalformedResponse)?;
        let pair = CredentialPair::new(
            refreshed.access,
            refreshed.refresh.unwrap_or(current.refresh_token),
        );
        self.store.set(&pair)?;

        info!("Access token refreshed");
        Ok(pair.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::client::storage::MemoryStorage;
    use crate::services::client::testing::{respond, MockTransport};
    use crate::services::config::StorageKeys;

    fn setup(transport: Arc<MockTransport>) -> (TokenRefresher, CredentialStore) {
        let store = CredentialStore::new(Arc::new(MemoryStorage::new()), StorageKeys::default());
        (TokenRefresher::new(transport, store.clone()), store)
    }

    #[tokio::test]
    async fn test_refresh_keeps_refresh_token_without_rotation() {
        let transport = MockTransport::new(|_| respond(200, json!({"access": "a2"})));
        let (refresher, store) = setup(transport.clone());
        store.set(&CredentialPair::new("a1", "r1")).unwrap();

        assert_eq!(refresher.refresh(Some("a1")).await, Ok("a2".to_string()));
        assert_eq!(store.get(), Some(CredentialPair::new("a2", "r1")));

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].path, REFRESH_PATH);
        assert_eq!(sent[0].body, Some(json!({"refresh": "r1"})));
        assert!(sent[0].bearer.is_none());
    }

    #[tokio::test]
    async fn test_refresh_stores_rotated_refresh_token() {
        let transport =
            MockTransport::new(|_| respond(200, json!({"access": "a2", "refresh": "r2"})));
        let (refresher, store) = setup(transport);
        store.set(&CredentialPair::new("a1", "r1")).unwrap();

        refresher.refresh(Some("a1")).await.unwrap();
        assert_eq!(store.get(), Some(CredentialPair::new("a2", "r2")));
    }

    #[tokio::test]
    async fn test_already_replaced_token_skips_network() {
        let transport = MockTransport::new(|_| respond(200, json!({"access": "never"})));
        let (refresher, store) = setup(transport.clone());
        store.set(&CredentialPair::new("a2", "r1")).unwrap();

        assert_eq!(refresher.refresh(Some("a1")).await, Ok("a2".to_string()));
        assert_eq!(transport.requests().len(), 0);
    }

    #[tokio::test]
    async fn test_missing_refresh_token() {
        let transport = MockTransport::new(|_| respond(200, json!({"access": "never"})));
        let (refresher, _) = setup(transport.clone());

        assert_eq!(
            refresher.refresh(Some("a1")).await,
            Err(RefreshError::MissingRefreshToken)
        );
        assert_eq!(transport.requests().len(), 0);
    }

    #[tokio::test]
    async fn test_rejected_and_malformed_refresh() {
        let transport = MockTransport::new(|_| respond(401, json!({"detail": "Token is blacklisted"})));
        let (refresher, store) = setup(transport);
        store.set(&CredentialPair::new("a1", "r1")).unwrap();
        assert_eq!(
            refresher.refresh(Some("a1")).await,
            Err(RefreshError::Rejected { status: 401 })
        );
        // Nothing is cleared by the refresher itself
        assert!(store.get().is_some());

        let transport = MockTransport::new(|_| respond(200, json!({"token": "a2"})));
        let (refresher, store) = setup(transport);
        store.set(&CredentialPair::new("a1", "r1")).unwrap();
        assert_eq!(
            refresher.refresh(Some("a1")).await,
            Err(RefreshError::MalformedResponse)
        );
    }

    fn seeded_store() -> CredentialStore {
        let store = CredentialStore::new(Arc::new(MemoryStorage::new()), StorageKeys::default());
        store.set(&CredentialPair::new("a1", "r1")).unwrap();
        store
    }

    #[tokio::test]
    async fn test_session_cleared_mid_refresh_stays_cleared() {
        let store = seeded_store();
        let teardown = store.clone();
        let transport = MockTransport::new(move |_| {
            teardown.clear_all();
            respond(200, json!({"access": "a2"}))
        });
        let refresher = TokenRefresher::new(transport, store.clone());

        assert_eq!(
            refresher.refresh(Some("a1")).await,
            Err(RefreshError::SessionEnded)
        );
        assert!(store.get().is_none());
        assert!(store.access_token().is_none());
    }

    #[tokio::test]
    async fn test_session_replaced_mid_refresh_is_kept() {
        let store = seeded_store();
        let next_login = store.clone();
        let transport = MockTransport::new(move |_| {
            next_login.set(&CredentialPair::new("b1", "r9")).unwrap();
            respond(200, json!({"access": "a2", "refresh": "r2"}))
        });
        let refresher = TokenRefresher::new(transport, store.clone());

        assert_eq!(refresher.refresh(Some("a1")).await, Ok("b1".to_string()));
        assert_eq!(store.get(), Some(CredentialPair::new("b1", "r9")));
    }
}
