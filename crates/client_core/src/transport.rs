use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use shared::error::ApiErrorBody;
use tracing::debug;
use url::Url;

use crate::{ApiResponse, HttpMethod, Transport, TransportError};

/// `Transport` backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{}/{path}", self.base_url)).map_err(|source| TransportError::Url {
            path: path.to_string(),
            source,
        })
    }
}

fn to_reqwest(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse, TransportError> {
        let url = self.endpoint(path)?;
        let network = |source| TransportError::Network {
            path: path.to_string(),
            source,
        };

        let mut request = self.http.request(to_reqwest(method), url);
        if let Some(body) = &body {
            request = request.json(body);
        }

        let res = request.send().await.map_err(network)?;
        let status = res.status();
        let bytes = res.bytes().await.map_err(network)?;
        debug!(%method, path, status = status.as_u16(), "http: response received");

        if !status.is_success() {
            return Err(TransportError::Status {
                path: path.to_string(),
                status: status.as_u16(),
                message: ApiErrorBody::from_slice(&bytes).and_then(|body| body.message),
            });
        }

        // Non-JSON success bodies (e.g. a bare "OK") are passed on as text.
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        Ok(ApiResponse::new(status.as_u16(), body))
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
