use std::time::Duration;

use tokio::time::sleep;
use tracing::{instrument, warn};

use super::Transport;
use crate::error::RosterError;

/// Exponential backoff settings for [`fetch_with_retry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Number of requests that will be sent before giving up. Never below one.
    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Delay to wait after the failed attempt with zero-based index `attempt`:
    /// `min(initial_delay * 2^attempt, max_delay)`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.initial_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }
}

/// How a failed request should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    /// Client-side HTTP error (4xx); retrying cannot help.
    Permanent,
    /// Server error or transport-level failure; worth retrying.
    Transient,
}

impl FailureKind {
    pub fn of(err: &RosterError) -> Self {
        match err {
            RosterError::UnexpectedStatus { status, .. } if status.is_client_error() => {
                FailureKind::Permanent
            }
            _ => FailureKind::Transient,
        }
    }
}

/// Result of a retried request.
#[derive(Debug)]
pub enum FetchOutcome {
    /// A 2xx response body.
    Success(String),
    /// A 4xx response; sent exactly once.
    Permanent(RosterError),
    /// Every allowed attempt failed with a transient error.
    Exhausted { attempts: u32, last: RosterError },
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    /// The response body, or `None` when the URL should be treated as having
    /// no data.
    pub fn into_body(self) -> Option<String> {
        match self {
            FetchOutcome::Success(body) => Some(body),
            FetchOutcome::Permanent(_) | FetchOutcome::Exhausted { .. } => None,
        }
    }
}

/// GET `url` through `transport`, retrying transient failures with capped
/// exponential backoff.
#[instrument(skip(transport, policy))]
pub async fn fetch_with_retry<T>(transport: &T, url: &str, policy: &RetryPolicy) -> FetchOutcome
where
    T: Transport + ?Sized,
{
    let attempts = policy.attempts();
    let mut attempt = 0;
    loop {
        let err = match transport.get(url).await {
            Ok(body) => return FetchOutcome::Success(body),
            Err(err) => err,
        };

        let kind = FailureKind::of(&err);
        if kind == FailureKind::Permanent {
            warn!(url, %kind, error = %err, "request failed, not retrying");
            return FetchOutcome::Permanent(err);
        }
        if attempt + 1 >= attempts {
            warn!(url, attempts, error = %err, "request failed, retries exhausted");
            return FetchOutcome::Exhausted {
                attempts,
                last: err,
            };
        }

        let delay = policy.delay_for(attempt);
        warn!(
            url,
            attempt = attempt + 1,
            attempts,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "request failed, retrying"
        );
        sleep(delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use reqwest::StatusCode;
    use tokio::time::Instant;

    use super::*;
    use crate::error::Result;

    /// Replays canned responses and records when each request was sent.
    struct ScriptedTransport {
        responses: Mutex<VecDeque<std::result::Result<String, StatusCode>>>,
        sent_at: Mutex<Vec<Instant>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<std::result::Result<String, StatusCode>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                sent_at: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.sent_at.lock().unwrap().len()
        }

        fn gaps(&self) -> Vec<Duration> {
            let sent_at = self.sent_at.lock().unwrap();
            sent_at.windows(2).map(|w| w[1] - w[0]).collect()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn get(&self, url: &str) -> Result<String> {
            self.sent_at.lock().unwrap().push(Instant::now());
            let next = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("more requests than scripted responses");
            next.map_err(|status| RosterError::UnexpectedStatus {
                url: url.to_owned(),
                status,
            })
        }
    }

    fn policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
        }
    }

    #[test]
    fn test_delay_doubles_and_caps() {
        let policy = policy(10);
        let delays: Vec<u64> = (0..6).map(|a| policy.delay_for(a).as_secs()).collect();
        assert_eq!(delays, vec![1, 2, 4, 8, 10, 10]);
        assert_eq!(policy.delay_for(64), Duration::from_secs(10));
    }

    #[test]
    fn test_classification() {
        let status = |code| RosterError::UnexpectedStatus {
            url: "https://x".to_string(),
            status: StatusCode::from_u16(code).unwrap(),
        };
        assert_eq!(FailureKind::of(&status(404)), FailureKind::Permanent);
        assert_eq!(FailureKind::of(&status(400)), FailureKind::Permanent);
        assert_eq!(FailureKind::of(&status(500)), FailureKind::Transient);
        assert_eq!(FailureKind::of(&status(503)), FailureKind::Transient);
        assert_eq!(FailureKind::Permanent.to_string(), "permanent");
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_first_attempt() {
        let transport = ScriptedTransport::new(vec![Ok("<html></html>".to_string())]);
        let outcome = fetch_with_retry(&transport, "https://x/a", &policy(3)).await;
        assert_eq!(outcome.into_body().as_deref(), Some("<html></html>"));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_is_never_retried() {
        let transport = ScriptedTransport::new(vec![Err(StatusCode::NOT_FOUND)]);
        let started = Instant::now();
        let outcome = fetch_with_retry(&transport, "https://x/a", &policy(3)).await;

        assert!(matches!(outcome, FetchOutcome::Permanent(_)));
        assert_eq!(transport.calls(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_errors_exhaust_after_max_retries() {
        let transport = ScriptedTransport::new(vec![
            Err(StatusCode::INTERNAL_SERVER_ERROR),
            Err(StatusCode::INTERNAL_SERVER_ERROR),
            Err(StatusCode::INTERNAL_SERVER_ERROR),
        ]);
        let outcome = fetch_with_retry(&transport, "https://x/a", &policy(3)).await;

        match outcome {
            FetchOutcome::Exhausted { attempts, .. } => assert_eq!(attempts, 3),
            other => panic!("expected exhaustion, got {other:?}"),
        }
        assert_eq!(transport.calls(), 3);
        assert_eq!(
            transport.gaps(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_transient_failure() {
        let transport = ScriptedTransport::new(vec![
            Err(StatusCode::BAD_GATEWAY),
            Ok("body".to_string()),
        ]);
        let outcome = fetch_with_retry(&transport, "https://x/a", &policy(3)).await;

        assert!(outcome.is_success());
        assert_eq!(transport.gaps(), vec![Duration::from_secs(1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_still_sends_one_request() {
        let transport = ScriptedTransport::new(vec![Err(StatusCode::SERVICE_UNAVAILABLE)]);
        let outcome = fetch_with_retry(&transport, "https://x/a", &policy(0)).await;

        assert!(matches!(outcome, FetchOutcome::Exhausted { attempts: 1, .. }));
        assert_eq!(transport.calls(), 1);
    }
}
