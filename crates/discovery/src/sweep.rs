use discovery_orchestrator::DiscoveryOrchestrator;
use std::sync::Arc;
use std::time::Duration;

/// Spawn a background task that calls [`DiscoveryOrchestrator::cleanup_sessions`]
/// every `interval`, evicting finished sessions older than `max_age`.
///
/// The orchestrator itself never schedules this sweep — `cleanup_sessions` is
/// callable on demand and has no opinion about cadence. Nothing is persisted
/// either way; a sweep just evicts memory the orchestrator would otherwise hold
/// onto forever. Dropping the returned handle without aborting it leaves the
/// sweep running for the orchestrator's lifetime; abort it to stop early.
pub fn spawn_session_sweeper(
    orchestrator: Arc<DiscoveryOrchestrator>,
    interval: Duration,
    max_age: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await; // first tick fires immediately; skip it
        loop {
            ticker.tick().await;
            let removed = orchestrator.cleanup_sessions(max_age);
            if removed > 0 {
                tracing::info!(removed, "swept expired discovery sessions");
            }
        }
    })
}
