use std::time::Duration;

use tokio::time::sleep;
use tracing::trace;

/// Fixed pause between sequential requests to the same site.
#[derive(Debug, Clone, Copy)]
pub struct RateLimiter {
    delay: Duration,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn interval(&self) -> Duration {
        self.delay
    }

    pub async fn delay(&self) {
        trace!(delay_ms = self.delay.as_millis() as u64, "rate limit pause");
        sleep(self.delay).await;
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::Instant;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_delay_waits_configured_interval() {
        let limiter = RateLimiter::new(Duration::from_millis(1500));
        let started = Instant::now();
        limiter.delay().await;
        assert_eq!(started.elapsed(), Duration::from_millis(1500));
        assert_eq!(limiter.interval(), Duration::from_millis(1500));
    }
}
