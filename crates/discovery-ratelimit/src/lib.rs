#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

//! The concurrency gate and retry/backoff engine shared by every scanner
//! invocation within one discovery session.

mod limiter;
mod sleep;

pub use limiter::{RateLimiter, RateLimiterConfig, RateLimiterError, RateLimiterStats};
pub use sleep::{default_async_sleep, AsyncSleep, SharedAsyncSleep, Sleep, TokioSleep};
