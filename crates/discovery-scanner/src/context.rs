use crate::credentials::Credential;
use discovery_ratelimit::RateLimiter;
use discovery_types::AccountContext;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Everything a [`crate::ServiceScanner::scan`] invocation needs for one
/// region.
#[derive(Clone)]
pub struct ScannerContext {
    /// Region to scan, or the primary region for a global scanner.
    pub region: String,
    /// Opaque credential for this session.
    pub credentials: Credential,
    /// Shared rate limiter for this session.
    pub rate_limiter: Arc<RateLimiter>,
    /// Account/subscription this session is scanning under.
    pub account: AccountContext,
    /// Session-wide cancellation token, threaded down so scanners can check it at
    /// natural boundaries between independent resource families.
    pub cancellation: CancellationToken,
}

impl ScannerContext {
    /// Build a new scanner context.
    pub fn new(
        region: impl Into<String>,
        credentials: Credential,
        rate_limiter: Arc<RateLimiter>,
        account: AccountContext,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            region: region.into(),
            credentials,
            rate_limiter,
            account,
            cancellation,
        }
    }

    /// Whether cancellation has been signaled for this session.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}
