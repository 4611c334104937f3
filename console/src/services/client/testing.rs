//! Scripted transport for exercising the pipeline without a network.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use super::api_client::ApiClient;
use super::credential_store::CredentialStore;
use super::errors::TransportError;
use super::storage::MemoryStorage;
use super::transport::{ApiRequest, ApiResponse, HttpTransport};
use crate::services::config::StorageKeys;
use crate::services::session::SessionSignal;

type Responder = dyn Fn(&ApiRequest) -> Result<ApiResponse, TransportError>;

/// Records every request and answers from a closure.
///
/// Each call yields to the scheduler once before answering, so concurrent
/// requests interleave at the network boundary like they do in the browser.
pub(crate) struct MockTransport {
    requests: Mutex<Vec<ApiRequest>>,
    responder: Box<Responder>,
}

impl MockTransport {
    pub(crate) fn new(
        responder: impl Fn(&ApiRequest) -> Result<ApiResponse, TransportError> + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        })
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn calls_to(&self, path_fragment: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|request| request.path.contains(path_fragment))
            .count()
    }
}

#[async_trait(?Send)]
impl HttpTransport for MockTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        tokio::task::yield_now().await;
        (self.responder)(request)
    }
}

pub(crate) fn respond(status: u16, body: Value) -> Result<ApiResponse, TransportError> {
    Ok(ApiResponse::new(status, body))
}

pub(crate) fn unreachable_host() -> Result<ApiResponse, TransportError> {
    Err(TransportError::new("connection refused"))
}

/// Everything a pipeline test needs to poke at
pub(crate) struct Harness {
    pub(crate) client: ApiClient,
    pub(crate) transport: Arc<MockTransport>,
    pub(crate) store: CredentialStore,
    pub(crate) backend: MemoryStorage,
    pub(crate) signal: SessionSignal,
}

pub(crate) fn harness(
    responder: impl Fn(&ApiRequest) -> Result<ApiResponse, TransportError> + 'static,
) -> Harness {
    harness_on(MemoryStorage::new(), responder)
}

/// Harness over an existing backend, so a responder can touch storage mid-request
pub(crate) fn harness_on(
    backend: MemoryStorage,
    responder: impl Fn(&ApiRequest) -> Result<ApiResponse, TransportError> + 'static,
) -> Harness {
    let transport = MockTransport::new(responder);
    let store = CredentialStore::new(Arc::new(backend.clone()), StorageKeys::default());
    let signal = SessionSignal::default();
    let client = ApiClient::with_parts(transport.clone(), store.clone(), signal.clone());
    Harness {
        client,
        transport,
        store,
        backend,
        signal,
    }
}
