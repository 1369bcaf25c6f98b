//! HTTP transport with retry logic and provider error detection.

mod client;
mod retry;

#[cfg(test)]
pub use client::MockTransport;
pub use client::{HttpClient, Transport};
pub use retry::{
    MAX_ATTEMPTS, ProviderError, RETRY_DELAY, RetryPolicy, is_error_response, with_retry,
};
