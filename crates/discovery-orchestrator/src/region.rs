use async_trait::async_trait;
use std::fmt::Debug;

/// Enumerates every region a provider exposes, for `RegionSelector::All`. Kept
/// as a trait for the same reason `CredentialProvider` is: the orchestrator
/// never talks to a real provider SDK directly, only through opaque contracts it
/// can fake in tests.
#[async_trait]
pub trait RegionLister: Debug + Send + Sync {
    /// List every region, in the provider's own enumeration order. The first
    /// entry becomes the primary region hosting global-service scans.
    async fn list_regions(&self) -> Result<Vec<String>, String>;
}

/// A [`RegionLister`] that always returns a fixed list, for configs that never
/// use `RegionSelector::All` and for tests.
#[derive(Debug, Clone)]
pub struct StaticRegionLister(pub Vec<String>);

#[async_trait]
impl RegionLister for StaticRegionLister {
    async fn list_regions(&self) -> Result<Vec<String>, String> {
        Ok(self.0.clone())
    }
}
