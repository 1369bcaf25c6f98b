//! HTTP transport for suggestion queries.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use super::retry::is_error_response;
use crate::config::Credentials;

/// Sends a GET request and decodes the response body as JSON.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, url: &str, query: &[(String, String)]) -> Result<Value>;
}

/// reqwest-backed transport with the service credentials preset as default headers.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a client that authenticates every request with `credentials`.
    pub fn with_credentials(credentials: &Credentials) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("dadata-rs/", env!("DADATA_VERSION")))
            .default_headers(credentials.headers()?)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::new(client))
    }
}

#[async_trait]
impl Transport for HttpClient {
    #[tracing::instrument(skip(self, query))]
    async fn get_json(&self, url: &str, query: &[(String, String)]) -> Result<Value> {
        debug!("GET JSON from {} with query {:?}...", url, query);

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .context("Failed to read response body")?;

        decode_body(status, &body)
    }
}

/// Decodes a response body.
///
/// Error envelopes are returned as values whatever the status code, so the
/// retry loop can classify them. An empty successful body decodes to `null`.
/// Anything else that is not a JSON payload with a 2xx status is an error.
fn decode_body(status: StatusCode, body: &[u8]) -> Result<Value> {
    if status.is_success() && body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(value) if status.is_success() || is_error_response(&value) => Ok(value),
        Ok(_) => bail!("HTTP {} error", status.as_u16()),
        Err(e) if status.is_success() => Err(e).context("Failed to parse JSON response"),
        Err(_) => bail!("HTTP {} error with a non-JSON body", status.as_u16()),
    }
}
