use crate::config::DiscoveryConfig;
use crate::inventory::InfrastructureInventory;
use crate::progress::DiscoveryProgress;
use uuid::Uuid;

/// One invocation of the orchestrator: its own progress, errors, and (on success)
/// inventory. Exclusively owned and mutated by the orchestrator's single worker
/// task for this session; callers only ever see a cloned snapshot.
#[derive(Debug, Clone)]
pub struct DiscoverySession {
    /// Session identifier, generated at creation.
    pub id: Uuid,
    /// The configuration this session was started with.
    pub config: DiscoveryConfig,
    /// Current progress snapshot.
    pub progress: DiscoveryProgress,
    /// Populated once the session reaches `Completed`. Never populated for a
    /// `Failed` session.
    pub inventory: Option<InfrastructureInventory>,
}

impl DiscoverySession {
    /// Create a new, `pending` session.
    pub fn new(id: Uuid, config: DiscoveryConfig, progress: DiscoveryProgress) -> Self {
        Self {
            id,
            config,
            progress,
            inventory: None,
        }
    }
}
