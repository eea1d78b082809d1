//! Plumbing shared by the HTTP-backed providers: error classification and
//! retry with exponential backoff.

use reqwest::{Client, Response, StatusCode};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::AIError;

/// Builds a client with the given request timeout.
pub(super) fn build_client(timeout: Duration) -> Result<Client, AIError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AIError::InvalidRequest(format!("failed to build HTTP client: {}", e)))
}

/// Maps a transport error from `send()`.
pub(super) fn send_error(err: reqwest::Error, timeout: Duration) -> AIError {
    if err.is_timeout() {
        AIError::Timeout {
            timeout_secs: timeout.as_secs() as u32,
        }
    } else if err.is_connect() {
        AIError::network(format!("Connection failed: {}", err))
    } else {
        AIError::network(err.to_string())
    }
}

/// Provider-specific knobs for status classification.
pub(super) struct StatusPolicy {
    /// Substrings of a 400 body that mean the prompt was too long.
    pub context_markers: &'static [&'static str],
    /// Retry-after used when the body does not say.
    pub default_retry_secs: u32,
}

/// Passes successful responses through and maps the rest to `AIError`.
pub(super) async fn check_status(response: Response, policy: &StatusPolicy) -> Result<Response, AIError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(classify(status, body, policy))
}

fn classify(status: StatusCode, body: String, policy: &StatusPolicy) -> AIError {
    match status.as_u16() {
        401 | 403 => AIError::AuthenticationFailed,
        429 => AIError::rate_limited(
            parse_retry_after(&body).unwrap_or(policy.default_retry_secs),
        ),
        400 if policy.context_markers.iter().any(|m| body.contains(m)) => {
            AIError::context_too_long(0, 0)
        }
        400 => AIError::InvalidRequest(body),
        500..=599 => AIError::unavailable(format!("Server error {}: {}", status, body)),
        _ => AIError::network(format!("Unexpected status {}: {}", status, body)),
    }
}

/// Reads "try again in Ns" out of a JSON error body.
fn parse_retry_after(body: &str) -> Option<u32> {
    let parsed: serde_json::Value = serde_json::from_str(body).ok()?;
    let message = parsed.get("error")?.get("message")?.as_str()?;
    let rest = &message[message.find("try again in ")? + "try again in ".len()..];
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Runs `attempt` until it succeeds, fails with a non-retryable error, or
/// `max_retries` retries are used up. Waits `base`, `2*base`, `4*base`, ...
pub(super) async fn with_retries<T, F, Fut>(
    max_retries: u32,
    base: Duration,
    mut attempt: F,
) -> Result<T, AIError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AIError>>,
{
    let mut retry = 0;
    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_retryable() || retry >= max_retries => return Err(err),
            Err(err) => {
                let delay = base * (1u32 << retry.min(16));
                tracing::debug!(error = %err, retry = retry + 1, ?delay, "retrying provider call");
                sleep(delay).await;
                retry += 1;
            }
        }
    }
}
