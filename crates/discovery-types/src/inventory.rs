use crate::error::{ScanError, ScanWarning};
use crate::provider::Provider;
use crate::resource::DiscoveredResource;
use crate::summary::InventorySummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The account or subscription a discovery session ran under.
///
/// One shape shared by both providers in place of two parallel optional fields,
/// since exactly one of the two is ever set for a given `provider`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountContext {
    /// AWS account id.
    pub account_id: Option<String>,
    /// Azure subscription id.
    pub subscription_id: Option<String>,
}

/// Metadata accompanying an inventory: timing, API call volume, and the full error
/// and warning logs accumulated across the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryMetadata {
    /// Wall-clock duration of the scan.
    pub scan_duration_ms: u64,
    /// Total provider API calls made across every scanner invocation.
    pub api_call_count: u64,
    /// When the scan worker started.
    pub started_at: DateTime<Utc>,
    /// When the scan worker finished.
    pub completed_at: DateTime<Utc>,
    /// Every error recorded during the scan.
    pub errors: Vec<ScanError>,
    /// Every warning recorded during the scan.
    pub warnings: Vec<ScanWarning>,
}

/// The immutable result of a completed discovery session. Consumers (e.g. the
/// out-of-scope Terraform generator) receive this via `get_inventory` and must not
/// mutate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfrastructureInventory {
    /// Inventory identifier (shares the owning session's id).
    pub id: Uuid,
    /// When this inventory was built.
    pub timestamp: DateTime<Utc>,
    /// Which provider this inventory was scanned from.
    pub provider: Provider,
    /// The account/subscription scanned.
    pub account: AccountContext,
    /// Regions that were scanned, in resolution order.
    pub regions: Vec<String>,
    /// Derived counts over `resources`.
    pub summary: InventorySummary,
    /// The deduplicated, merged resource list.
    pub resources: Vec<DiscoveredResource>,
    /// Timing, API call volume, and error/warning logs.
    pub metadata: InventoryMetadata,
}
