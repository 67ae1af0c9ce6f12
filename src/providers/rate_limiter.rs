//! @ai:module:intent Pace outbound requests to the hosted AI service
//! @ai:module:layer infrastructure
//! @ai:module:public_api RateLimiter
//! @ai:module:stateless false

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// @ai:intent Token bucket allowing `requests_per_minute` calls with a full-minute burst
pub struct RateLimiter {
    bucket: Mutex<Bucket>,
    requests_per_minute: u32,
}

struct Bucket {
    tokens: f64,
    refilled_at: Instant,
}

impl Bucket {
    fn refill(&mut self, per_second: f64, capacity: f64) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.refilled_at).as_secs_f64();
        self.tokens = (self.tokens + elapsed * per_second).min(capacity);
        self.refilled_at = now;
    }
}

impl RateLimiter {
    /// @ai:intent Create a limiter; zero disables pacing
    /// @ai:effects pure
    pub fn new(requests_per_minute: u32) -> Self {
        Self {
            bucket: Mutex::new(Bucket {
                tokens: requests_per_minute as f64,
                refilled_at: Instant::now(),
            }),
            requests_per_minute,
        }
    }

    fn per_second(&self) -> f64 {
        self.requests_per_minute as f64 / 60.0
    }

    /// @ai:intent Take a token without waiting
    /// @ai:post returns the wait needed before a token is available when none is
    /// @ai:effects state:write
    pub async fn try_acquire(&self) -> Result<(), Duration> {
        if self.requests_per_minute == 0 {
            return Ok(());
        }

        let mut bucket = self.bucket.lock().await;
        bucket.refill(self.per_second(), self.requests_per_minute as f64);

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            Ok(())
        } else {
            Err(Duration::from_secs_f64((1.0 - bucket.tokens) / self.per_second()))
        }
    }

    /// @ai:intent Wait for a token unless the wait would exceed `limit`
    /// @ai:post Err carries the wait that was refused
    /// @ai:effects state:write, time
    pub async fn acquire_within(&self, limit: Duration) -> Result<(), Duration> {
        loop {
            match self.try_acquire().await {
                Ok(()) => return Ok(()),
                Err(wait) if wait > limit => return Err(wait),
                Err(wait) => {
                    tracing::debug!("Hosted AI request paced for {:?}", wait);
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initial_burst_is_immediate() {
        let limiter = RateLimiter::new(3);
        let start = Instant::now();
        for _ in 0..3 {
            assert!(limiter.acquire_within(Duration::from_secs(1)).await.is_ok());
        }
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_exhausted_bucket_reports_wait() {
        let limiter = RateLimiter::new(60);
        for _ in 0..60 {
            assert!(limiter.try_acquire().await.is_ok());
        }
        let wait = limiter.try_acquire().await.unwrap_err();
        assert!(wait > Duration::from_millis(900));
        assert!(wait <= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_wait_beyond_limit_is_refused() {
        let limiter = RateLimiter::new(1);
        assert!(limiter.acquire_within(Duration::from_secs(1)).await.is_ok());

        let start = Instant::now();
        let wait = limiter.acquire_within(Duration::from_secs(1)).await.unwrap_err();
        assert!(wait > Duration::from_secs(50));
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_short_wait_within_limit_is_paced() {
        let limiter = RateLimiter::new(600);
        for _ in 0..600 {
            assert!(limiter.try_acquire().await.is_ok());
        }
        let start = Instant::now();
        assert!(limiter.acquire_within(Duration::from_secs(1)).await.is_ok());
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_zero_disables_pacing() {
        let limiter = RateLimiter::new(0);
        for _ in 0..1000 {
            assert!(limiter.try_acquire().await.is_ok());
        }
    }
}
