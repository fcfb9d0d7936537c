//! An async-runtime-agnostic sleep abstraction, so the backoff loop in
//! [`crate::RateLimiter`] can be driven by a deterministic fake clock in tests
//! instead of a real wall-clock sleep.

use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

/// A trait with a single `sleep` method, implemented for whatever async runtime
/// hosts this crate.
pub trait AsyncSleep: Debug + Send + Sync {
    /// Returns a future that resolves after `duration` has elapsed.
    fn sleep(&self, duration: Duration) -> Sleep;
}

/// A boxed, runtime-agnostic sleep future.
#[must_use]
pub struct Sleep(Pin<Box<dyn Future<Output = ()> + Send + 'static>>);

impl Sleep {
    /// Wrap any future as a [`Sleep`].
    pub fn new(future: impl Future<Output = ()> + Send + 'static) -> Self {
        Sleep(Box::pin(future))
    }
}

impl Future for Sleep {
    type Output = ();

    fn poll(
        mut self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Self::Output> {
        self.0.as_mut().poll(cx)
    }
}

/// A cloneable, type-erased [`AsyncSleep`].
#[derive(Clone, Debug)]
pub struct SharedAsyncSleep(Arc<dyn AsyncSleep>);

impl SharedAsyncSleep {
    /// Wrap a concrete sleep implementation for sharing across scanners/sessions.
    pub fn new(sleep: impl AsyncSleep + 'static) -> Self {
        Self(Arc::new(sleep))
    }
}

impl AsyncSleep for SharedAsyncSleep {
    fn sleep(&self, duration: Duration) -> Sleep {
        self.0.sleep(duration)
    }
}

/// Tokio-backed [`AsyncSleep`], used in production.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleep;

impl AsyncSleep for TokioSleep {
    fn sleep(&self, duration: Duration) -> Sleep {
        Sleep::new(tokio::time::sleep(duration))
    }
}

/// The default production sleep implementation.
pub fn default_async_sleep() -> SharedAsyncSleep {
    SharedAsyncSleep::new(TokioSleep)
}
