//! Background maintenance tasks.
//!
//! The purge task physically removes turns past their `expires_at`.
//! Context queries already exclude expired rows, so the sweep cadence
//! affects storage size only, never response correctness.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use sitevoice_core::memory::engine::MemoryEngine;
use sitevoice_core::memory::store::TurnRepository;

/// Periodically delete expired conversation turns until cancelled.
pub async fn run_purge_task<T: TurnRepository>(
    engine: Arc<MemoryEngine<T>>,
    interval_secs: u64,
    shutdown: CancellationToken,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    // First tick fires immediately, cleaning up after downtime.
    loop {
        tokio::select! {
            _ = interval.tick() => {
                match engine.turns().purge_expired(chrono::Utc::now()).await {
                    Ok(0) => {}
                    Ok(removed) => tracing::info!(removed, "purged expired conversation turns"),
                    Err(error) => tracing::warn!(%error, "turn purge sweep failed"),
                }
            }
            _ = shutdown.cancelled() => {
                tracing::debug!("purge task stopping");
                return;
            }
        }
    }
}
