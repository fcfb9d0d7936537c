use crate::sleep::{default_async_sleep, SharedAsyncSleep};
use discovery_types::{ClassifyScanError, ScanErrorKind};
use rand::Rng;
use std::future::Future;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

const DEFAULT_MAX_CONCURRENT: usize = 10;
const DEFAULT_MAX_RETRIES: u32 = 5;
const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(250);
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

/// Tunables for a [`RateLimiter`].
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Maximum number of API calls allowed in flight at once.
    pub max_concurrent: usize,
    /// Maximum retry attempts for throttled/transient errors.
    pub max_retries: u32,
    /// Base delay used in `base * 2^attempt + jitter(0..base)`.
    pub base_delay: Duration,
    /// Hard cap on any single computed backoff delay.
    pub max_delay: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

/// Point-in-time counters for a [`RateLimiter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiterStats {
    /// Every attempt made, including retries.
    pub total_requests: u64,
    /// Attempts classified as throttled or transient (and therefore retried).
    pub throttled_requests: u64,
    /// Slots currently held.
    pub current_concurrent: usize,
    /// Callers currently waiting for a slot.
    pub queue_length: usize,
}

impl RateLimiterStats {
    /// Fraction of attempts that were throttled/transient, in `[0.0, 1.0]`.
    pub fn throttle_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.throttled_requests as f64 / self.total_requests as f64
        }
    }
}

/// The error `RateLimiter::with_backoff` surfaces once it gives up on an
/// operation, distinguishing *why* it gave up.
#[derive(Debug)]
pub enum RateLimiterError<E> {
    /// The op's error was classified as terminal on the first or a later attempt.
    Terminal(E),
    /// Throttled/transient retries were exhausted without success.
    RetriesExhausted(E),
    /// Cancellation was signaled while waiting for a concurrency slot or between
    /// retries.
    Cancelled,
}

impl<E> RateLimiterError<E> {
    /// The underlying op error, if this wasn't a cancellation.
    pub fn into_inner(self) -> Option<E> {
        match self {
            RateLimiterError::Terminal(e) | RateLimiterError::RetriesExhausted(e) => Some(e),
            RateLimiterError::Cancelled => None,
        }
    }
}

/// A per-scan-context concurrency gate with retrying, jittered exponential
/// backoff for throttled/transient provider errors.
///
/// Shared (via `Arc`/`Clone`) across every scanner invocation within one
/// [`crate::sleep`]-driven session; `Clone` is cheap, all state lives behind
/// `Arc`.
#[derive(Clone)]
pub struct RateLimiter {
    semaphore: Arc<Semaphore>,
    config: RateLimiterConfig,
    sleeper: SharedAsyncSleep,
    cancellation: CancellationToken,
    total_requests: Arc<AtomicU64>,
    throttled_requests: Arc<AtomicU64>,
    queue_length: Arc<AtomicUsize>,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}

impl RateLimiter {
    /// Build a rate limiter with the default config and a Tokio-backed sleep.
    pub fn new(cancellation: CancellationToken) -> Self {
        Self::with_config(RateLimiterConfig::default(), cancellation)
    }

    /// Build a rate limiter with an explicit config.
    pub fn with_config(config: RateLimiterConfig, cancellation: CancellationToken) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
            config,
            sleeper: default_async_sleep(),
            cancellation,
            total_requests: Arc::new(AtomicU64::new(0)),
            throttled_requests: Arc::new(AtomicU64::new(0)),
            queue_length: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Swap in a fake sleep implementation for deterministic tests.
    #[doc(hidden)]
    pub fn with_sleeper(mut self, sleeper: SharedAsyncSleep) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Current point-in-time statistics.
    pub fn stats(&self) -> RateLimiterStats {
        RateLimiterStats {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            throttled_requests: self.throttled_requests.load(Ordering::Relaxed),
            current_concurrent: self.config.max_concurrent - self.semaphore.available_permits(),
            queue_length: self.queue_length.load(Ordering::Relaxed),
        }
    }

    /// Wrap an idempotent async provider call with concurrency limiting and
    /// throttle/transient retry. Never panics; a terminal error is handed back to
    /// the caller to record as a `ScanError`.
    pub async fn with_backoff<F, Fut, T, E>(&self, op: F) -> Result<T, RateLimiterError<E>>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: ClassifyScanError,
    {
        self.queue_length.fetch_add(1, Ordering::Relaxed);
        let permit = tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => {
                self.queue_length.fetch_sub(1, Ordering::Relaxed);
                return Err(RateLimiterError::Cancelled);
            }
            permit = self.semaphore.clone().acquire_owned() => {
                self.queue_length.fetch_sub(1, Ordering::Relaxed);
                permit.expect("semaphore is never closed")
            }
        };

        let mut attempt: u32 = 0;
        loop {
            if self.cancellation.is_cancelled() {
                drop(permit);
                return Err(RateLimiterError::Cancelled);
            }
            self.total_requests.fetch_add(1, Ordering::Relaxed);
            match op().await {
                Ok(value) => {
                    drop(permit);
                    return Ok(value);
                }
                Err(err) => {
                    let kind = err.classify();
                    if !kind.is_retryable() {
                        drop(permit);
                        return Err(RateLimiterError::Terminal(err));
                    }
                    self.throttled_requests.fetch_add(1, Ordering::Relaxed);
                    if attempt >= self.config.max_retries {
                        tracing::warn!(
                            attempt,
                            max_retries = self.config.max_retries,
                            "retry budget exhausted for throttled/transient error"
                        );
                        drop(permit);
                        return Err(RateLimiterError::RetriesExhausted(err));
                    }
                    let delay = self.backoff_delay(attempt);
                    tracing::debug!(attempt, ?delay, ?kind, "retrying after backoff");
                    attempt += 1;
                    self.sleeper.sleep(delay).await;
                }
            }
        }
    }

    fn backoff_delay(&self, attempt: u32) -> Duration {
        let base = self.config.base_delay;
        let exponential = base.saturating_mul(1u32.checked_shl(attempt).unwrap_or(u32::MAX));
        let jitter_millis = rand::thread_rng().gen_range(0..=base.as_millis().max(1) as u64);
        let delay = exponential + Duration::from_millis(jitter_millis);
        delay.min(self.config.max_delay)
    }
}
