use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{instrument, warn};

use super::auth::is_credential_issuing;
use super::credential_store::CredentialStore;
use super::error_normalizer::normalize;
use super::errors::{ClientResult, ErrorKind, NormalizedError, GENERIC_MESSAGE};
use super::storage::default_storage;
use super::token_refresh::TokenRefresher;
use super::transport::{ApiRequest, HttpTransport, ReqwestTransport};
use crate::services::config::ConsoleConfig;
use crate::services::session::SessionSignal;
use crate::{console_error, console_warn};

/// HTTP client for the dispatch backend.
///
/// Attaches the stored access token to every call, recovers from one expired
/// token per call through [`TokenRefresher`], and turns every failure into a
/// [`NormalizedError`]. Clones share credentials, refresh guard and signal.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    store: CredentialStore,
    refresher: Arc<TokenRefresher>,
    signal: SessionSignal,
}

impl ApiClient {
    /// Client talking to the configured backend over `reqwest`
    pub fn new(config: &ConsoleConfig) -> Self {
        let store = CredentialStore::new(default_storage(), config.storage_keys.clone());
        Self::with_parts(
            Arc::new(ReqwestTransport::new(config)),
            store,
            SessionSignal::new(config.signal_capacity),
        )
    }

    pub fn with_parts(
        transport: Arc<dyn HttpTransport>,
        store: CredentialStore,
        signal: SessionSignal,
    ) -> Self {
        let refresher = Arc::new(TokenRefresher::new(transport.clone(), store.clone()));
        Self {
            transport,
            store,
            refresher,
            signal,
        }
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.store
    }

    pub fn signal(&self) -> &SessionSignal {
        &self.signal
    }

    /// Run one call through the pipeline and return its success body
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn execute(&self, mut request: ApiRequest) -> ClientResult<Value> {
        loop {
            // After a successful refresh the store already holds the new token.
            request.bearer = self.store.access_token();

            let response = match self.transport.send(&request).await {
                Ok(response) => response,
                Err(e) => {
                    console_warn!("{}", e);
                    return Err(normalize(None));
                }
            };

            if response.is_success() {
                return Ok(response.body);
            }

            let failure = normalize(Some(&response));
            if !response.is_auth_failure() {
                return Err(failure);
            }
            if is_credential_issuing(&request.path) {
                return Err(failure.with_kind(ErrorKind::Unauthorized));
            }
            if request.is_retry() {
                console_warn!("{} rejected again after refresh", request.path);
                self.invalidate_session();
                return Err(failure.with_kind(ErrorKind::SessionExpired));
            }

            match self.refresher.refresh(request.bearer.as_deref()).await {
                Ok(_) => request.attempt += 1,
                Err(e) => {
                    console_error!("Session could not be refreshed: {}", e);
                    self.invalidate_session();
                    return Err(failure.with_kind(ErrorKind::SessionExpired));
                }
            }
        }
    }

    /// Drop every stored credential and tell subscribers the session is gone
    fn invalidate_session(&self) {
        self.store.clear_all();
        self.signal.publish();
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send_json(ApiRequest::get(path)).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(ApiRequest::post(path).with_body(encode(body)?))
            .await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(ApiRequest::new(Method::PUT, path).with_body(encode(body)?))
            .await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(ApiRequest::new(Method::PATCH, path).with_body(encode(body)?))
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send_json(ApiRequest::new(Method::DELETE, path)).await
    }

    async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T> {
        let path = request.path.clone();
        let body = self.execute(request).await?;
        serde_json::from_value(body).map_err(|e| {
            warn!("Unexpected response body from {}: {}", path, e);
            NormalizedError::unexpected_response(None)
        })
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> ClientResult<Value> {
    serde_json::to_value(body).map_err(|e| {
        warn!("Request body could not be encoded: {}", e);
        NormalizedError::fallback(ErrorKind::Unknown, GENERIC_MESSAGE, None)
    })
}
