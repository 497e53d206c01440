use std::time::Duration;

use opensearch::http::{StatusCode, response::Response};

use crate::{Result, error::OpensearchClientError};

#[cfg(test)]
mod test;

const INITIAL_RETRY_DELAY_MS: u64 = 100;
const MAX_RETRY_DELAY_MS: u64 = 5_000;

/// true for statuses that mean "try again later" rather than "this request is wrong"
pub fn is_transient_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

/// How requests are retried on transient failures.
/// Connection errors and transient statuses are always retried, timeouts only if
/// `retry_on_timeout` is set. Delays double after each attempt up to a cap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// retries after the first attempt
    pub max_retries: u32,
    /// whether a request timeout counts as retryable
    pub retry_on_timeout: bool,
    /// delay before the first retry
    pub initial_delay: Duration,
    /// upper bound for the delay between two attempts
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 10,
            retry_on_timeout: true,
            initial_delay: Duration::from_millis(INITIAL_RETRY_DELAY_MS),
            max_delay: Duration::from_millis(MAX_RETRY_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// The delay to wait before retry number `attempt` (0 based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    pub(crate) fn should_retry_error(&self, err: &OpensearchClientError) -> bool {
        match err {
            OpensearchClientError::Timeout { .. } => self.retry_on_timeout,
            OpensearchClientError::ConnectionFailed { .. } => true,
            _ => false,
        }
    }

    /// Runs `request` until it produces a non transient response or the retries run out.
    /// The last response is returned as is, so a transient status that outlived the retries
    /// still reaches the caller.
    pub(crate) async fn send<F, Fut>(&self, method: &'static str, request: F) -> Result<Response>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = std::result::Result<Response, opensearch::Error>>,
    {
        let mut attempt = 0;
        loop {
            let retry_reason = match request().await {
                Ok(response)
                    if is_transient_status(response.status_code())
                        && attempt < self.max_retries =>
                {
                    format!("status {}", response.status_code())
                }
                Ok(response) => return Ok(response),
                Err(err) => {
                    let err = OpensearchClientError::from_transport(&err, method);
                    if attempt >= self.max_retries || !self.should_retry_error(&err) {
                        tracing::error!(
                            method = %method,
                            attempts = attempt + 1,
                            error = %err,
                            "request failed"
                        );
                        return Err(err);
                    }
                    err.to_string()
                }
            };

            let delay = self.delay_for(attempt);
            tracing::warn!(
                method = %method,
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                reason = %retry_reason,
                "transient failure, retrying after delay"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
