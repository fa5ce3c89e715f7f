//! InteractionSink trait definition.
//!
//! Fire-and-forget analytics. The sink contract is infallible from the
//! caller's point of view: implementations log and swallow their own
//! failures, and no dialogue or memory code path may depend on a record
//! having landed.

use sitevoice_types::interaction::InteractionEvent;

/// Sink for widget interaction events.
///
/// Implementations live in sitevoice-infra (e.g., `SqliteInteractionRepository`)
/// or wrap an HTTP POST on the client side. Uses native async fn in traits
/// (RPITIT, Rust 2024 edition).
pub trait InteractionSink: Send + Sync {
    /// Record an event, best-effort. Never returns an error.
    fn record(&self, event: InteractionEvent) -> impl std::future::Future<Output = ()> + Send;
}

/// Sink that drops every event. Used when analytics are disabled and in tests.
#[derive(Debug, Default, Clone)]
pub struct NullSink;

impl InteractionSink for NullSink {
    async fn record(&self, _event: InteractionEvent) {}
}
