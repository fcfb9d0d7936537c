use crate::error::DiscoveryError;
use crate::region::RegionLister;
use dashmap::DashMap;
use discovery_ratelimit::{RateLimiter, RateLimiterConfig};
use discovery_scanner::{ScannerContext, ScannerRegistry, SharedCredentialProvider};
use discovery_types::{
    merge_resources, AccountContext, DiscoveryConfig, DiscoveryProgress, DiscoverySession, InfrastructureInventory,
    InventoryMetadata, InventorySummary, Provider, RegionSelector, ScanError, SessionStatus, GLOBAL_REGION,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Called non-blocking after each scanner invocation and after each region
/// completes. The worker never awaits this callback.
pub type ProgressCallback = Arc<dyn Fn(&DiscoveryProgress) + Send + Sync>;

/// Drives discovery sessions for one provider's registry of scanners.
///
/// One orchestrator is wired to exactly one [`Provider`]: `InfrastructureInventory`
/// carries a single `provider` field, and mixing AWS and Azure scanners behind one
/// registry would make that field meaningless. Run one orchestrator per provider
/// in a process that discovers both (the facade crate wires both).
pub struct DiscoveryOrchestrator {
    provider: Provider,
    registry: ScannerRegistry,
    credentials: SharedCredentialProvider,
    region_lister: Arc<dyn RegionLister>,
    sessions: DashMap<Uuid, Arc<RwLock<DiscoverySession>>>,
    cancellations: DashMap<Uuid, CancellationToken>,
}

impl DiscoveryOrchestrator {
    /// Build an orchestrator for `provider`, backed by `registry` and `credentials`,
    /// using `region_lister` to resolve `RegionSelector::All`.
    pub fn new(
        provider: Provider,
        registry: ScannerRegistry,
        credentials: SharedCredentialProvider,
        region_lister: Arc<dyn RegionLister>,
    ) -> Self {
        Self {
            provider,
            registry,
            credentials,
            region_lister,
            sessions: DashMap::new(),
            cancellations: DashMap::new(),
        }
    }

    /// The scanner registry this orchestrator drives.
    pub fn registry(&self) -> &ScannerRegistry {
        &self.registry
    }

    /// Validate credentials, resolve regions/services, create a `pending` session,
    /// and kick off its worker. Only setup failures (bad credentials, no regions
    /// resolved) propagate as `Err`; everything after session creation is recorded
    /// into the session instead.
    pub async fn start_discovery(
        &self,
        config: DiscoveryConfig,
        on_progress: Option<ProgressCallback>,
    ) -> Result<Uuid, DiscoveryError> {
        let validation = self.credentials.validate_credentials().await;
        if !validation.valid {
            return Err(DiscoveryError::CredentialInvalid(
                validation.error.unwrap_or_else(|| "credential validation failed".to_string()),
            ));
        }
        let credential = validation.credential.expect("valid credential carries a value");

        let mut regions = match &config.regions {
            RegionSelector::List(list) => list.clone(),
            RegionSelector::All => self
                .region_lister
                .list_regions()
                .await
                .map_err(DiscoveryError::Internal)?,
        };
        regions.retain(|region| !config.exclude_regions.contains(region));
        if regions.is_empty() {
            return Err(DiscoveryError::NoRegionsResolved);
        }

        let default_services = self.registry.get_service_names();
        let mut services = config.services.clone().unwrap_or(default_services);
        services.retain(|service| !config.exclude_services.contains(service) && self.registry.has(service));

        let account = AccountContext {
            account_id: config.account_id.clone().or_else(|| self.credentials.default_account_id()),
            subscription_id: config
                .subscription_id
                .clone()
                .or_else(|| self.credentials.default_subscription_id()),
        };

        let global_count = services
            .iter()
            .filter_map(|service| self.registry.get(service))
            .filter(|scanner| scanner.is_global())
            .count();
        let total_services = services.len() * regions.len() - global_count * regions.len().saturating_sub(1);

        let id = Uuid::new_v4();
        let now = chrono::Utc::now();
        let progress = DiscoveryProgress::new(regions.len(), total_services, now);
        let session = DiscoverySession::new(id, config.clone(), progress);
        let session = Arc::new(RwLock::new(session));
        self.sessions.insert(id, session.clone());

        let cancellation = CancellationToken::new();
        self.cancellations.insert(id, cancellation.clone());

        let rate_limiter = Arc::new(RateLimiter::with_config(
            RateLimiterConfig {
                max_concurrent: config.concurrency.unwrap_or(10),
                ..RateLimiterConfig::default()
            },
            cancellation.clone(),
        ));

        let worker = WorkerInputs {
            session_id: id,
            session,
            registry: self.registry.clone(),
            credential,
            account,
            provider: self.provider,
            regions,
            services,
            rate_limiter,
            cancellation: cancellation.clone(),
            on_progress,
        };

        tracing::info!(
            session_id = %id,
            provider = ?self.provider,
            region_count = worker.regions.len(),
            service_count = worker.services.len(),
            "discovery session starting"
        );

        if let Some(timeout) = config.timeout {
            tokio::spawn(run_worker_with_timeout(worker, timeout));
        } else {
            tokio::spawn(run_worker(worker));
        }

        Ok(id)
    }

    /// Read-only progress snapshot for a session.
    pub async fn get_progress(&self, session_id: Uuid) -> Result<DiscoveryProgress, DiscoveryError> {
        let session = self.find(session_id)?;
        Ok(session.read().await.progress.clone())
    }

    /// Read-only inventory for a session, or `None` if not yet completed.
    pub async fn get_inventory(&self, session_id: Uuid) -> Result<Option<InfrastructureInventory>, DiscoveryError> {
        let session = self.find(session_id)?;
        Ok(session.read().await.inventory.clone())
    }

    /// A full, read-only snapshot of a session.
    pub async fn get_session(&self, session_id: Uuid) -> Result<DiscoverySession, DiscoveryError> {
        let session = self.find(session_id)?;
        Ok(session.read().await.clone())
    }

    /// Signal cancellation for an in-progress session. Pending and already-finished
    /// sessions are unaffected.
    pub async fn cancel_discovery(&self, session_id: Uuid) -> Result<(), DiscoveryError> {
        let session = self.find(session_id)?;
        let status = session.read().await.progress.status;
        if status == SessionStatus::InProgress {
            if let Some(token) = self.cancellations.get(&session_id) {
                token.cancel();
            }
        }
        Ok(())
    }

    /// Remove every session whose worker started more than `max_age` ago and which
    /// has already reached `completed`/`failed`. Returns the count removed.
    pub fn cleanup_sessions(&self, max_age: Duration) -> usize {
        let now = chrono::Utc::now();
        let mut to_remove = Vec::new();
        for entry in self.sessions.iter() {
            let id = *entry.key();
            let session = entry.value().clone();
            if let Ok(guard) = session.try_read() {
                let age = now.signed_duration_since(guard.progress.started_at);
                let is_finished = matches!(guard.progress.status, SessionStatus::Completed | SessionStatus::Failed);
                if is_finished && age.num_milliseconds() as u128 > max_age.as_millis() {
                    to_remove.push(id);
                }
            }
        }
        for id in &to_remove {
            self.sessions.remove(id);
            self.cancellations.remove(id);
        }
        to_remove.len()
    }

    fn find(&self, session_id: Uuid) -> Result<Arc<RwLock<DiscoverySession>>, DiscoveryError> {
        self.sessions
            .get(&session_id)
            .map(|entry| entry.value().clone())
            .ok_or(DiscoveryError::SessionNotFound(session_id))
    }
}

struct WorkerInputs {
    session_id: Uuid,
    session: Arc<RwLock<DiscoverySession>>,
    registry: ScannerRegistry,
    credential: discovery_scanner::Credential,
    account: AccountContext,
    provider: Provider,
    regions: Vec<String>,
    services: Vec<String>,
    rate_limiter: Arc<RateLimiter>,
    cancellation: CancellationToken,
    on_progress: Option<ProgressCallback>,
}

async fn run_worker_with_timeout(worker: WorkerInputs, timeout: Duration) {
    let cancellation = worker.cancellation.clone();
    let session = worker.session.clone();
    tokio::select! {
        _ = run_worker(worker) => {}
        _ = tokio::time::sleep(timeout) => {
            cancellation.cancel();
            let mut guard = session.write().await;
            if guard.progress.status == SessionStatus::InProgress {
                finalize_as_failed(&mut guard, "session timeout exceeded", Some("Timeout"));
            }
        }
    }
}

async fn run_worker(mut worker: WorkerInputs) {
    {
        let mut guard = worker.session.write().await;
        guard.progress.status = SessionStatus::InProgress;
    }

    let mut all_resources = Vec::new();
    let mut all_errors: Vec<ScanError> = Vec::new();
    let services = std::mem::take(&mut worker.services);

    'regions: for (region_idx, region) in worker.regions.iter().enumerate() {
        if worker.cancellation.is_cancelled() {
            record_cancellation(&mut all_errors, "", region);
            break 'regions;
        }
        {
            let mut guard = worker.session.write().await;
            guard.progress.current_region = Some(region.clone());
        }

        for service in &services {
            if worker.cancellation.is_cancelled() {
                record_cancellation(&mut all_errors, service, region.as_str());
                break 'regions;
            }
            let Some(scanner) = worker.registry.get(service) else {
                continue;
            };
            if scanner.is_global() && region_idx != 0 {
                continue;
            }
            {
                let mut guard = worker.session.write().await;
                guard.progress.current_service = Some(service.clone());
            }

            let scan_region = if scanner.is_global() { GLOBAL_REGION.to_string() } else { region.clone() };
            let ctx = ScannerContext::new(
                scan_region,
                worker.credential.clone(),
                worker.rate_limiter.clone(),
                worker.account.clone(),
                worker.cancellation.clone(),
            );

            let (resources, errors) = match tokio::spawn(async move { scanner.scan(&ctx).await }).await {
                Ok(outcome) => outcome,
                Err(join_error) => {
                    tracing::warn!(%service, %region, %join_error, "scanner invocation panicked");
                    (
                        Vec::new(),
                        vec![ScanError {
                            service: service.clone(),
                            region: region.clone(),
                            operation: ScanError::SCAN_OPERATION.to_string(),
                            message: join_error.to_string(),
                            code: None,
                            timestamp: chrono::Utc::now(),
                        }],
                    )
                }
            };

            if !errors.is_empty() {
                tracing::warn!(
                    session_id = %worker.session_id,
                    %service,
                    %region,
                    error_count = errors.len(),
                    "scan family reported errors"
                );
            }

            all_resources.extend(resources);
            all_errors.extend(errors);

            let mut guard = worker.session.write().await;
            guard.progress.services_scanned += 1;
            guard.progress.resources_found = all_resources.len();
            guard.progress.errors = all_errors.clone();
            guard.progress.updated_at = chrono::Utc::now();
            let snapshot = guard.progress.clone();
            drop(guard);
            if let Some(callback) = &worker.on_progress {
                callback(&snapshot);
            }
        }

        let mut guard = worker.session.write().await;
        guard.progress.regions_scanned += 1;
        guard.progress.updated_at = chrono::Utc::now();
        let snapshot = guard.progress.clone();
        drop(guard);
        tracing::info!(
            session_id = %worker.session_id,
            %region,
            regions_scanned = snapshot.regions_scanned,
            resources_found = snapshot.resources_found,
            "region scan complete"
        );
        if let Some(callback) = &worker.on_progress {
            callback(&snapshot);
        }
    }

    let mut guard = worker.session.write().await;
    if guard.progress.status != SessionStatus::InProgress {
        return;
    }
    if worker.cancellation.is_cancelled() {
        finalize_as_failed(&mut guard, "cancelled by user", None);
        guard.progress.errors = all_errors;
        return;
    }

    let started_at = guard.progress.started_at;
    let resources = merge_resources(all_resources);
    let summary = InventorySummary::from_resources(&resources);
    let completed_at = chrono::Utc::now();
    let inventory = InfrastructureInventory {
        id: worker.session_id,
        timestamp: completed_at,
        provider: worker.provider,
        account: worker.account.clone(),
        regions: worker.regions.clone(),
        summary,
        resources,
        metadata: InventoryMetadata {
            scan_duration_ms: (completed_at - started_at).num_milliseconds().max(0) as u64,
            api_call_count: worker.rate_limiter.stats().total_requests,
            started_at,
            completed_at,
            errors: all_errors.clone(),
            // `ServiceScanner::scan` only ever returns (resources, errors); a scanner's
            // `ScanBuffer::record_warning` calls never leave the scanner, so this is
            // always empty today. Kept for the shape's sake in case a future scanner
            // surface widens to expose them.
            warnings: Vec::new(),
        },
    };

    guard.progress.status = SessionStatus::Completed;
    guard.progress.errors = all_errors;
    guard.progress.updated_at = completed_at;
    tracing::info!(
        session_id = %worker.session_id,
        resource_count = inventory.summary.total_resources,
        scan_duration_ms = inventory.metadata.scan_duration_ms,
        "discovery session complete"
    );
    guard.inventory = Some(inventory);
}

fn finalize_as_failed(session: &mut DiscoverySession, message: &str, code: Option<&str>) {
    let now = chrono::Utc::now();
    session.progress.status = SessionStatus::Failed;
    session.progress.errors.push(ScanError {
        service: session.progress.current_service.clone().unwrap_or_default(),
        region: session.progress.current_region.clone().unwrap_or_default(),
        operation: ScanError::CANCEL_OPERATION.to_string(),
        message: message.to_string(),
        code: code.map(str::to_string),
        timestamp: now,
    });
    session.progress.updated_at = now;
    session.inventory = None;
}

fn record_cancellation(errors: &mut Vec<ScanError>, service: &str, region: &str) {
    errors.push(ScanError::cancelled(service.to_string(), region.to_string(), chrono::Utc::now()));
}
