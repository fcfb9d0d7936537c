use crate::error::ScanError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A [`DiscoverySession`](crate::DiscoverySession)'s place in its state machine.
///
/// Transitions are monotonic: `pending -> in_progress -> {completed, failed}`. A
/// `completed` or `failed` session never changes status again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Created but the scan worker hasn't started its first region yet.
    Pending,
    /// The scan worker is actively driving the region x service matrix.
    InProgress,
    /// Finished; `inventory` is populated (possibly sparsely).
    Completed,
    /// Finished without an inventory: setup failure, cancellation, timeout, or an
    /// internal invariant violation.
    Failed,
}

/// A read-only snapshot of a session's progress, published atomically by the
/// worker and read concurrently by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryProgress {
    /// Current lifecycle status.
    pub status: SessionStatus,
    /// Regions fully scanned so far.
    pub regions_scanned: usize,
    /// Total regions in the resolved region list.
    pub total_regions: usize,
    /// Services fully scanned so far, across all regions.
    pub services_scanned: usize,
    /// Total service invocations the worker expects to make (regions x services,
    /// with global services counted once).
    pub total_services: usize,
    /// Resources discovered so far (pre-dedup running total).
    pub resources_found: usize,
    /// The region currently being scanned, if any.
    pub current_region: Option<String>,
    /// The service currently being scanned, if any.
    pub current_service: Option<String>,
    /// Errors accumulated so far.
    pub errors: Vec<ScanError>,
    /// When the session's worker started.
    pub started_at: DateTime<Utc>,
    /// When this snapshot was produced.
    pub updated_at: DateTime<Utc>,
}

impl DiscoveryProgress {
    /// Build the initial snapshot for a freshly created, still-`pending` session.
    pub fn new(total_regions: usize, total_services: usize, now: DateTime<Utc>) -> Self {
        Self {
            status: SessionStatus::Pending,
            regions_scanned: 0,
            total_regions,
            services_scanned: 0,
            total_services,
            resources_found: 0,
            current_region: None,
            current_service: None,
            errors: Vec::new(),
            started_at: now,
            updated_at: now,
        }
    }
}
