use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, instrument};

use super::errors::TransportError;
use crate::services::config::{join_url, ConsoleConfig};
use crate::console_warn;

/// Description of one outbound call.
///
/// `attempt` counts refresh-driven reissues of the same call: 0 for the
/// original, 1 for the single retry after a successful refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub bearer: Option<String>,
    pub attempt: u8,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            bearer: None,
            attempt: 0,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn is_retry(&self) -> bool {
        self.attempt > 0
    }
}

/// A received HTTP response with its body parsed as JSON
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Non-JSON text becomes a JSON string, an empty body becomes `null`
    pub fn from_text(status: u16, text: &str) -> Self {
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
        };
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_auth_failure(&self) -> bool {
        self.status == 401
    }
}

/// Network boundary of the request pipeline.
///
/// Not `Send`: the console runs on the browser's single-threaded event loop.
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// `reqwest` transport rooted at the configured API base URL
#[derive(Clone)]
pub struct ReqwestTransport {
    http_client: Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(config: &ConsoleConfig) -> Self {
        let http_client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|e| {
                console_warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });
        Self {
            http_client,
            base_url: config.api_base_url.clone(),
        }
    }
}

#[async_trait(?Send)]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path, attempt = request.attempt))]
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = join_url(&self.base_url, &request.path);

        let mut builder = self.http_client.request(request.method.clone(), &url);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::new(format!("{} {} failed: {}", request.method, url, e)))?;

        let status = response.status().as_u16();
        let text = body_text(response.text().await, &url);
        debug!("{} {} -> {}", request.method, url, status);

        Ok(ApiResponse::from_text(status, &text))
    }
}

/// A body that cannot be read is treated as empty, after saying so
fn body_text<E: std::fmt::Display>(read: Result<String, E>, url: &str) -> String {
    read.unwrap_or_else(|e| {
        console_warn!("Could not read response body from {}: {}", url, e);
        String::new()
    })
}
