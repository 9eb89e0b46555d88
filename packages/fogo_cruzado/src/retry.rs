//! HTTP retry helpers for transient errors.
//!
//! Every client request goes through [`send_json`] instead of calling
//! `reqwest::RequestBuilder::send()` directly, so connection failures,
//! timeouts, HTTP 429 and HTTP 5xx are retried with exponential backoff.
//! The budget is small because these requests sit on an HTTP request
//! path.
//!
//! ```ignore
//! let body: OccurrencePage =
//!     retry::send_json(&policy, || client.get(&url).query(&params)).await?;
//! ```

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::FogoCruzadoError;

/// Maximum length of the response body preview included in error logs.
const BODY_PREVIEW_LEN: usize = 500;

/// Retry budget for one logical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry. Doubles on every further retry.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    /// Two retries, 500 ms then 1 s.
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// No retries at all.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    fn delay(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

/// Sends an HTTP request and parses the body as `T`.
///
/// The `build_request` closure is called on each attempt, because
/// builders are consumed by `.send()`.
///
/// # Errors
///
/// * [`FogoCruzadoError::Unauthorized`] on HTTP 401 (never retried here;
///   the caller owns token refresh).
/// * [`FogoCruzadoError::Status`] on any other non-retryable status, or
///   on 429/5xx once retries are exhausted.
/// * [`FogoCruzadoError::Http`] when the request cannot be sent.
/// * [`FogoCruzadoError::Json`] when the body does not decode as `T`.
#[allow(clippy::future_not_send)]
pub async fn send_json<T, F>(policy: &RetryPolicy, build_request: F) -> Result<T, FogoCruzadoError>
where
    T: DeserializeOwned,
    F: Fn() -> reqwest::RequestBuilder,
{
    let response = send_inner(policy, &build_request).await?;
    let url = response.url().to_string();
    let text = response.text().await?;

    serde_json::from_str(&text).map_err(|e| {
        let preview = text.get(..BODY_PREVIEW_LEN).unwrap_or(&text);
        log::warn!("JSON decode failed\n  url: {url}\n  error: {e}\n  body: {preview}");
        FogoCruzadoError::Json(e)
    })
}

/// Core retry loop. Returns the response once its status is 2xx or 3xx.
#[allow(clippy::future_not_send)]
async fn send_inner<F>(
    policy: &RetryPolicy,
    build_request: &F,
) -> Result<reqwest::Response, FogoCruzadoError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut attempt = 0;

    loop {
        if attempt > 0 {
            let delay = policy.delay(attempt);
            log::warn!("  retry {attempt}/{} in {delay:?}...", policy.max_retries);
            tokio::time::sleep(delay).await;
        }
        let can_retry = attempt < policy.max_retries;
        attempt += 1;

        let response = match build_request().send().await {
            Ok(response) => response,
            Err(e) if is_transient(&e) && can_retry => {
                log::warn!("  transient error: {e}");
                continue;
            }
            Err(e) => return Err(FogoCruzadoError::Http(e)),
        };

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(FogoCruzadoError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            if can_retry {
                log::warn!("  HTTP {status} from {}", response.url());
                continue;
            }
            return Err(status_error(&response));
        }

        if status.is_client_error() {
            return Err(status_error(&response));
        }

        return Ok(response);
    }
}

fn status_error(response: &reqwest::Response) -> FogoCruzadoError {
    FogoCruzadoError::Status {
        status: response.status().as_u16(),
        url: response.url().to_string(),
    }
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_request()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay(1), Duration::from_millis(500));
        assert_eq!(policy.delay(2), Duration::from_secs(1));
        assert_eq!(policy.delay(3), Duration::from_secs(2));
    }

    #[test]
    fn none_has_no_budget() {
        assert_eq!(RetryPolicy::none().max_retries, 0);
    }
}
