//! Retry loop for suggestion queries with provider error envelope detection.

use anyhow::{Result, anyhow};
use log::{debug, warn};
use serde_json::Value;
use std::time::Duration;

/// Maximum number of attempts for a single query.
pub const MAX_ATTEMPTS: usize = 3;

/// Pause between two consecutive attempts.
pub const RETRY_DELAY: Duration = Duration::from_secs(5);

/// How many times a query is attempted and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            delay: RETRY_DELAY,
        }
    }
}

/// Business-level failure reported by the service in place of a payload.
///
/// The service signals these with a JSON object carrying `family`, `reason`
/// and `message` together. Any response missing one of the three is a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub family: String,
    pub reason: String,
    pub message: String,
}

impl ProviderError {
    /// Extracts the error envelope from a decoded response, if it is one.
    pub fn from_response(response: &Value) -> Option<Self> {
        let field = |key: &str| match response.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        };

        Some(Self {
            family: field("family")?,
            reason: field("reason")?,
            message: field("message")?,
        })
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Provider error ({}, {}): {}",
            self.family, self.reason, self.message
        )
    }
}

impl std::error::Error for ProviderError {}

/// Returns true if the response is a provider error envelope.
pub fn is_error_response(response: &Value) -> bool {
    ProviderError::from_response(response).is_some()
}

/// Runs `operation` until it yields a response that is not an error envelope.
///
/// Error envelopes and transport failures both consume an attempt. The pause
/// only happens between attempts. Once attempts run out the last outcome is
/// handed back unchanged: an envelope comes back as `Ok`, a transport failure
/// as `Err`.
pub async fn with_retry<F, Fut>(
    operation_name: &str,
    policy: &RetryPolicy,
    operation: F,
) -> Result<Value>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<Value>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut last = None;

    for attempt in 1..=attempts {
        let failure = match operation().await {
            Ok(response) => match ProviderError::from_response(&response) {
                None => {
                    debug!("{}: succeeded on attempt {}", operation_name, attempt);
                    return Ok(response);
                }
                Some(err) => {
                    let reason = err.to_string();
                    last = Some(Ok(response));
                    reason
                }
            },
            Err(e) => {
                let reason = format!("{:#}", e);
                last = Some(Err(e));
                reason
            }
        };

        if attempt < attempts {
            warn!(
                "{}: attempt {}/{} failed ({}), retrying in {}ms...",
                operation_name,
                attempt,
                attempts,
                failure,
                policy.delay.as_millis()
            );
            tokio::time::sleep(policy.delay).await;
        } else {
            warn!(
                "{}: giving up after {} attempts ({})",
                operation_name, attempts, failure
            );
        }
    }

    last.unwrap_or_else(|| {
        Err(anyhow!(
            "{}: failed after {} attempts",
            operation_name,
            attempts
        ))
    })
}
