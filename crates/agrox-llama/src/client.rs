// SPDX-FileCopyrightText: 2026 AgroX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for a llama.cpp completion server.
//!
//! Provides [`LlamaClient`] which handles request construction, timeouts,
//! and transient error retry.

use std::time::Duration;

use agrox_config::model::LlamaConfig;
use agrox_core::AgroxError;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, CompletionRequest, CompletionResponse};

/// Path appended to the configured base URL.
const COMPLETION_PATH: &str = "/completion";

/// HTTP client for llama.cpp server communication.
///
/// Manages connection pooling, the per-request timeout, and retry logic for
/// transient errors (429, 500, 502, 503).
#[derive(Debug, Clone)]
pub struct LlamaClient {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
    max_retries: u32,
    retry_delay: Duration,
}

impl LlamaClient {
    /// Creates a client for the server described by `config`.
    pub fn new(config: &LlamaConfig) -> Result<Self, AgroxError> {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| AgroxError::Generation {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint: completion_url(&config.base_url),
            timeout,
            max_retries: config.max_retries,
            retry_delay: Duration::from_secs(1),
        })
    }

    /// Returns the full completion endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Shortens the pause between retries (for testing with wiremock).
    #[cfg(test)]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Sends a non-streaming completion request and returns the response.
    ///
    /// On transient errors, retries up to `max_retries` times after a pause.
    pub async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, AgroxError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying completion request after transient error");
                tokio::time::sleep(self.retry_delay).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .json(request)
                .send()
                .await
                .map_err(|e| self.transport_error(e))?;

            let status = response.status();
            debug!(status = %status, attempt, "completion response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| self.transport_error(e))?;
                let completion: CompletionResponse =
                    serde_json::from_str(&body).map_err(|e| AgroxError::Generation {
                        message: format!("failed to parse completion response: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                return Ok(completion);
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(AgroxError::generation(format!(
                    "server returned {status}: {body}"
                )));
                continue;
            }

            // Non-transient error or exhausted retries.
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "llama.cpp error ({}): {}",
                    api_err.error.type_.as_deref().unwrap_or("unknown"),
                    api_err.error.message
                ),
                Err(_) => format!("server returned {status}: {body}"),
            };
            return Err(AgroxError::generation(message));
        }

        Err(last_error
            .unwrap_or_else(|| AgroxError::generation("completion request failed after retries")))
    }

    fn transport_error(&self, e: reqwest::Error) -> AgroxError {
        if e.is_timeout() {
            return AgroxError::Timeout {
                duration: self.timeout,
            };
        }
        AgroxError::Generation {
            message: format!("HTTP request failed: {e}"),
            source: Some(Box::new(e)),
        }
    }
}

/// Joins the base URL and the completion path, tolerating a trailing slash.
fn completion_url(base_url: &str) -> String {
    format!("{}{COMPLETION_PATH}", base_url.trim_end_matches('/'))
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503)
}
