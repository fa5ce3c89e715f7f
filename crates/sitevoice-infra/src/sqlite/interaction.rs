//! SQLite interaction event sink.
//!
//! Implements the fire-and-forget `InteractionSink` contract: insert
//! failures are logged and swallowed, never surfaced to the caller.

use sitevoice_core::event::sink::InteractionSink;
use sitevoice_types::interaction::InteractionEvent;

use super::pool::DatabasePool;

/// Best-effort SQLite sink for widget interaction events.
#[derive(Clone)]
pub struct SqliteInteractionRepository {
    pool: DatabasePool,
}

impl SqliteInteractionRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Number of recorded events for a site. Used by tests and reporting.
    pub async fn count_for_site(&self, site_id: &str) -> Result<u64, sqlx::Error> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM interactions WHERE site_id = ?")
                .bind(site_id)
                .fetch_one(&self.pool.reader)
                .await?;
        Ok(count.0 as u64)
    }
}

impl InteractionSink for SqliteInteractionRepository {
    async fn record(&self, event: InteractionEvent) {
        let result = sqlx::query(
            r#"INSERT INTO interactions (id, site_id, session_id, kind, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(event.id.to_string())
        .bind(&event.site_id)
        .bind(&event.session_id)
        .bind(event.kind.to_string())
        .bind(event.created_at.to_rfc3339())
        .execute(&self.pool.writer)
        .await;

        if let Err(error) = result {
            tracing::warn!(%error, site_id = %event.site_id, "dropped interaction event");
        }
    }
}
