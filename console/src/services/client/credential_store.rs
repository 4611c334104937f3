use std::sync::Arc;

use tracing::{info, warn};

use super::storage::KeyValueStorage;
use super::types::{CredentialPair, Session};
use crate::services::config::StorageKeys;
use crate::services::errors::{StorageError, StorageResult};

/// Owner of the persisted token pair and session snapshot.
///
/// Pure storage with no policy: tokens are opaque, every operation is
/// synchronous, and clearing an empty store is a no-op. Clones share the same
/// backend.
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn KeyValueStorage>,
    keys: StorageKeys,
}

impl CredentialStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>, keys: StorageKeys) -> Self {
        Self { storage, keys }
    }

    /// The stored pair, only when both tokens are present
    pub fn get(&self) -> Option<CredentialPair> {
        let access_token = self.storage.get(&self.keys.access_token)?;
        let refresh_token = self.storage.get(&self.keys.refresh_token)?;
        Some(CredentialPair {
            access_token,
            refresh_token,
        })
    }

    pub fn access_token(&self) -> Option<String> {
        self.storage.get(&self.keys.access_token)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.storage.get(&self.keys.refresh_token)
    }

    /// Write both tokens or neither
    pub fn set(&self, pair: &CredentialPair) -> StorageResult<()> {
        self.storage
            .set(&self.keys.refresh_token, &pair.refresh_token)?;
        if let Err(e) = self.storage.set(&self.keys.access_token, &pair.access_token) {
            self.clear();
            return Err(e);
        }
        Ok(())
    }

    pub fn clear(&self) {
        self.storage.delete(&self.keys.access_token);
        self.storage.delete(&self.keys.refresh_token);
    }

    /// Cached session record; a snapshot that fails to parse reads as absent
    pub fn get_session_snapshot(&self) -> Option<Session> {
        let raw = self.storage.get(&self.keys.session)?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Stored session snapshot is unreadable: {}", e);
                None
            }
        }
    }

    pub fn has_session_snapshot(&self) -> bool {
        self.storage.get(&self.keys.session).is_some()
    }

    pub fn set_session_snapshot(&self, session: &Session) -> StorageResult<()> {
        let json = serde_json::to_string(session).map_err(|e| StorageError::Serialization {
            key: self.keys.session.clone(),
            reason: e.to_string(),
        })?;
        self.storage.set(&self.keys.session, &json)
    }

    pub fn clear_session_snapshot(&self) {
        self.storage.delete(&self.keys.session);
    }

    /// Remove tokens and snapshot together
    pub fn clear_all(&self) {
        self.clear();
        self.clear_session_snapshot();
        info!("Stored credentials and session cleared");
    }
}
