//! Repository trait definitions for the memory engine.
//!
//! The turn store is the only mutable shared resource in the system. It is
//! written by exactly one component (the memory engine) and read by the
//! same. Uses native async fn in traits (RPITIT, Rust 2024 edition);
//! implementations live in sitevoice-infra.

use chrono::{DateTime, Utc};
use sitevoice_types::error::RepositoryError;
use sitevoice_types::turn::ConversationTurn;
use sitevoice_types::widget::WidgetConfig;

/// Repository for the append-only conversation turn log.
pub trait TurnRepository: Send + Sync {
    /// Append a turn. Turns are immutable once written.
    fn append(
        &self,
        turn: &ConversationTurn,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// All non-expired turns for a visitor on a site, across all sessions,
    /// ordered by `created_at` ascending.
    ///
    /// Implementations must filter strictly by both `site_id` and
    /// `visitor_id` and exclude any turn with `expires_at <= now`.
    fn visitor_history(
        &self,
        site_id: &str,
        visitor_id: &str,
        now: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<Vec<ConversationTurn>, RepositoryError>> + Send;

    /// Number of turns recorded for one session.
    fn session_turn_count(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<u32, RepositoryError>> + Send;

    /// Delete turns with `expires_at <= now`. Returns the number removed.
    fn purge_expired(
        &self,
        now: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}

/// Repository for per-site widget configuration overrides.
pub trait WidgetConfigRepository: Send + Sync {
    /// Stored override for a site, if any.
    fn get(
        &self,
        site_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<WidgetConfig>, RepositoryError>> + Send;

    /// Insert or replace a site's override.
    fn upsert(
        &self,
        config: &WidgetConfig,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
