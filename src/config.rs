//! Client configuration: credentials, endpoint and retry settings.

use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

use crate::http::RetryPolicy;

/// Base address of the suggestion REST API.
pub const DEFAULT_API_URL: &str = "https://suggestions.dadata.ru/suggestions/api/4_1/rs";

/// Header carrying the API secret.
pub const SECRET_HEADER: HeaderName = HeaderName::from_static("x-secret");

/// API token and secret issued by the service.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    token: String,
    secret: String,
}

impl Credentials {
    pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            secret: secret.into(),
        }
    }

    /// Builds the default headers attached to every request.
    /// Credential headers are marked sensitive so they never show up in debug output.
    pub fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        let mut auth_value = HeaderValue::from_str(&format!("Token {}", self.token))
            .context("API token contains characters not allowed in an HTTP header")?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        let mut secret_value = HeaderValue::from_str(&self.secret)
            .context("API secret contains characters not allowed in an HTTP header")?;
        secret_value.set_sensitive(true);
        headers.insert(SECRET_HEADER, secret_value);

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Ok(headers)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// What a query hands back once retries are exhausted on a provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderErrorPolicy {
    /// Treat the error envelope as an empty response.
    #[default]
    Degrade,
    /// Fail the call with a `ProviderError`.
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub retry: RetryPolicy,
    pub provider_errors: ProviderErrorPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            retry: RetryPolicy::default(),
            provider_errors: ProviderErrorPolicy::default(),
        }
    }
}

impl ClientConfig {
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry.delay = delay;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.retry.max_attempts = max_attempts;
        self
    }

    pub fn with_provider_errors(mut self, policy: ProviderErrorPolicy) -> Self {
        self.provider_errors = policy;
        self
    }

    /// Full URL of `<method>/<kind>` under the configured base.
    pub fn endpoint(&self, method: &str, kind: &str) -> String {
        format!("{}/{}/{}", self.api_url.trim_end_matches('/'), method, kind)
    }
}
