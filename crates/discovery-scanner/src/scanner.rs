use crate::context::ScannerContext;
use async_trait::async_trait;
use discovery_types::{DiscoveredResource, ScanError};
use std::fmt::Debug;

/// Everything a single `scan()` invocation returns: whatever resources it could
/// gather, plus every error it hit along the way. A scanner never fails fatally —
/// this is the only channel errors leave a scanner through.
pub type ScanOutcome = (Vec<DiscoveredResource>, Vec<ScanError>);

/// The uniform contract implemented once per cloud service.
///
/// A `ServiceScanner` is stateless across invocations: implementations must not
/// accumulate state on `self` between calls to `scan`, since the same instance is
/// shared across concurrent sessions.
#[async_trait]
pub trait ServiceScanner: Debug + Send + Sync {
    /// Stable identifier used as the registry key and as `DiscoveredResource::service`.
    fn service_name(&self) -> &str;

    /// Whether this service's API surface is not region-partitioned. The
    /// orchestrator invokes a global scanner exactly once, for the primary region.
    fn is_global(&self) -> bool;

    /// Enumerate this service's resources in `ctx.region` (or the primary region,
    /// for a global scanner). Must never fail fatally: every failure becomes a
    /// `ScanError` in the returned buffer.
    async fn scan(&self, ctx: &ScannerContext) -> ScanOutcome;

    /// The neutral resource types this scanner may produce.
    fn resource_types(&self) -> Vec<String>;
}
