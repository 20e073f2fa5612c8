//! Shared retry envelope for provider requests
//!
//! Both providers speak plain HTTPS with the same failure modes, so the
//! bounded-backoff loop lives here instead of being repeated per client.

use std::time::Duration;

use tracing::{debug, warn};

use super::LlmError;

/// Maximum number of retries for transient errors
const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Check if an HTTP status code is retryable (529 is Anthropic's overloaded)
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504 | 529)
}

/// Send `request`, retrying transient failures with exponential backoff.
///
/// A 429 returns `RateLimited` immediately with any `retry-after` hint;
/// other retryable statuses and network errors back off and go again. The
/// request must carry a cloneable body (ours are all small JSON).
pub(super) async fn send_with_retry(request: reqwest::RequestBuilder) -> Result<reqwest::Response, LlmError> {
    let mut last_error = None;

    for attempt in 0..=MAX_RETRIES {
        if attempt > 0 {
            let backoff = INITIAL_BACKOFF_MS << (attempt - 1);
            warn!(attempt, backoff_ms = backoff, "send_with_retry: retrying after transient error");
            tokio::time::sleep(Duration::from_millis(backoff)).await;
        }

        let attempt_request = request
            .try_clone()
            .ok_or_else(|| LlmError::InvalidResponse("request body is not cloneable".to_string()))?;

        let response = match attempt_request.send().await {
            Ok(r) => r,
            Err(e) => {
                debug!(attempt, error = %e, "send_with_retry: network error");
                last_error = Some(LlmError::Network(e));
                continue;
            }
        };

        let status = response.status().as_u16();

        if status == 429 {
            debug!("send_with_retry: rate limited (429)");
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);

            return Err(LlmError::RateLimited {
                retry_after: Duration::from_secs(retry_after),
            });
        }

        if is_retryable_status(status) && attempt < MAX_RETRIES {
            let message = response.text().await.unwrap_or_default();
            debug!(attempt, status, "send_with_retry: retryable error");
            last_error = Some(LlmError::ApiError { status, message });
            continue;
        }

        if !response.status().is_success() {
            debug!(status, "send_with_retry: API error");
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, message });
        }

        return Ok(response);
    }

    Err(last_error.unwrap_or_else(|| LlmError::InvalidResponse("Max retries exceeded".to_string())))
}
