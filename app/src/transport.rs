//! Executes core `HttpRequest` values over the network.
//!
//! The core crate never performs I/O; this module is the host half of that
//! split. Transport failures become `FetchError::Network` carrying the
//! underlying message, and every response (2xx or not) is returned as data
//! so that status interpretation stays in `ProfileClient`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use profile_core::{FetchError, HttpMethod, HttpRequest, HttpResponse};
use reqwest::{Client, Method};
use tracing::debug;

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, FetchError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        (**self).execute(request).await
    }
}

/// Reqwest-backed transport. No timeout unless one is configured.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        let method = match request.method {
            HttpMethod::Get => Method::GET,
        };
        debug!(method = request.method.as_str(), url = %request.path, "sending request");

        let mut builder = self.client.request(method, &request.path);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(network_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.text().await.map_err(network_error)?;
        debug!(status, bytes = body.len(), "received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn network_error(err: reqwest::Error) -> FetchError {
    FetchError::Network(err.to_string())
}
