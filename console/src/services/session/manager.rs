use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::broadcast::Receiver;
use tracing::{info, instrument, warn};

use super::permissions::{Capability, Role};
use super::signal::SessionInvalidated;
use crate::services::client::errors::{ClientResult, ErrorKind, NormalizedError};
use crate::services::client::types::{LoginResponse, OtpChallenge, Session};
use crate::services::client::ApiClient;
use crate::{console_info, console_warn};

pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Check your credentials.";
pub const SESSION_NOT_SAVED_MESSAGE: &str = "Could not save the session in this browser.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    /// Startup, before persisted credentials have been checked
    Restoring,
    Authenticated(Session),
}

impl SessionState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

/// Process-wide record of who is logged in and what they may do.
///
/// The manager is the only writer of [`SessionState`]; UI code receives a
/// clone through context. Invalidation signals from the request pipeline are
/// applied before every state read, so a reader never sees an
/// `Authenticated` state whose credentials were already discarded.
#[derive(Clone)]
pub struct SessionManager {
    client: ApiClient,
    state: Arc<Mutex<SessionState>>,
    invalidations: Arc<Mutex<Receiver<SessionInvalidated>>>,
}

impl SessionManager {
    /// Manager in the `Restoring` state; call [`SessionManager::bootstrap`] next
    pub fn new(client: ApiClient) -> Self {
        let invalidations = client.signal().subscribe();
        Self {
            client,
            state: Arc::new(Mutex::new(SessionState::Restoring)),
            invalidations: Arc::new(Mutex::new(invalidations)),
        }
    }

    /// Create and immediately restore from persisted storage
    pub fn start(client: ApiClient) -> Self {
        let manager = Self::new(client);
        manager.bootstrap();
        manager
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Restore the persisted session without contacting the backend.
    ///
    /// Token validity is discovered by the first real call. Anything short of
    /// an access token plus a readable snapshot wipes all three keys.
    pub fn bootstrap(&self) -> SessionState {
        self.discard_pending_invalidations();
        let store = self.client.credentials();

        let next = match (store.access_token(), store.get_session_snapshot()) {
            (Some(_), Some(session)) => {
                console_info!("Restored session for {}", session.display_name);
                SessionState::Authenticated(session)
            }
            (token, _) => {
                if token.is_some() || store.has_session_snapshot() {
                    console_warn!("Discarding incomplete persisted session");
                }
                store.clear_all();
                SessionState::Unauthenticated
            }
        };

        self.set_state(next.clone());
        next
    }

    pub fn state(&self) -> SessionState {
        self.apply_pending_invalidations();
        self.lock_state().clone()
    }

    pub fn current_session(&self) -> Option<Session> {
        self.state().session().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state(), SessionState::Authenticated(_))
    }

    pub fn role(&self) -> Option<Role> {
        self.current_session().map(|session| session.role)
    }

    pub fn has_permission(&self, capability: Capability) -> bool {
        self.role().is_some_and(|role| role.grants(capability))
    }

    /// Tag form of [`SessionManager::has_permission`]; unknown tags are never granted
    pub fn has_permission_tag(&self, tag: &str) -> bool {
        tag.parse::<Capability>()
            .is_ok_and(|capability| self.has_permission(capability))
    }

    #[instrument(skip(self, password), err)]
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        let response = self
            .client
            .email_login(email, password)
            .await
            .map_err(|e| e.or_message(LOGIN_FAILED_MESSAGE))?;
        self.complete_login(response)
    }

    /// First step of phone login: have a one-time code sent
    pub async fn request_otp(&self, phone: &str) -> ClientResult<OtpChallenge> {
        self.client.phone_login(phone).await
    }

    #[instrument(skip(self, code), err)]
    pub async fn login_with_otp(&self, phone: &str, code: &str) -> ClientResult<Session> {
        let response = self
            .client
            .verify_otp(phone, code)
            .await
            .map_err(|e| e.or_message(LOGIN_FAILED_MESSAGE))?;
        self.complete_login(response)
    }

    fn complete_login(&self, response: LoginResponse) -> ClientResult<Session> {
        let session = response
            .to_session()
            .ok_or_else(|| NormalizedError::unexpected_response(None).or_message(LOGIN_FAILED_MESSAGE))?;

        let store = self.client.credentials();
        let persisted = store
            .set(&response.credentials())
            .and_then(|_| store.set_session_snapshot(&session));
        if let Err(e) = persisted {
            warn!("Failed to persist session: {}", e);
            store.clear_all();
            return Err(NormalizedError::new(
                ErrorKind::Unknown,
                SESSION_NOT_SAVED_MESSAGE,
                None,
            ));
        }

        // Signals raised for the previous session must not end this one.
        self.discard_pending_invalidations();
        self.set_state(SessionState::Authenticated(session.clone()));
        info!("Logged in as {} ({})", session.display_name, session.role);
        Ok(session)
    }

    /// End the session. Local teardown happens even when the backend is unreachable.
    pub async fn logout(&self) {
        let store = self.client.credentials();
        if let Some(refresh_token) = store.refresh_token() {
            if let Err(e) = self.client.logout(&refresh_token).await {
                console_warn!("Server-side logout failed: {}", e);
            }
        }
        store.clear_all();
        self.set_state(SessionState::Unauthenticated);
        info!("Logged out");
    }

    /// Drop the session immediately, from any state
    pub fn force_logout(&self) {
        self.client.credentials().clear_all();
        self.set_state(SessionState::Unauthenticated);
        console_warn!("Session invalidated");
    }

    /// Apply invalidation signals as they arrive and report each resulting state.
    ///
    /// Runs for as long as the signal has a publisher, which is the lifetime of
    /// the client.
    pub async fn watch_invalidations(&self, mut on_change: impl FnMut(SessionState)) {
        let mut receiver = self.client.signal().subscribe();
        loop {
            match receiver.recv().await {
                Ok(SessionInvalidated) | Err(RecvError::Lagged(_)) => {
                    on_change(self.state());
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    fn apply_pending_invalidations(&self) {
        if self.drain_invalidations() {
            self.force_logout();
        }
    }

    fn discard_pending_invalidations(&self) {
        self.drain_invalidations();
    }

    /// Empty the receiver; true if anything was pending
    fn drain_invalidations(&self) -> bool {
        let mut receiver = self
            .invalidations
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut pending = false;
        loop {
            match receiver.try_recv() {
                Ok(SessionInvalidated) | Err(TryRecvError::Lagged(_)) => pending = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return pending,
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, next: SessionState) {
        *self.lock_state() = next;
    }
}
