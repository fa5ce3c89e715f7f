//! SQLite conversation turn repository.
//!
//! Implements `TurnRepository` from `sitevoice-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, RFC3339 datetime
//! strings.

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use sitevoice_core::memory::store::TurnRepository;
use sitevoice_types::error::RepositoryError;
use sitevoice_types::turn::ConversationTurn;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `TurnRepository`.
pub struct SqliteTurnRepository {
    pool: DatabasePool,
}

impl SqliteTurnRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain ConversationTurn.
struct TurnRow {
    id: String,
    site_id: String,
    session_id: String,
    visitor_id: String,
    user_message: String,
    assistant_message: String,
    model: String,
    created_at: String,
    expires_at: String,
    token_estimate: i64,
}

impl TurnRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            site_id: row.try_get("site_id")?,
            session_id: row.try_get("session_id")?,
            visitor_id: row.try_get("visitor_id")?,
            user_message: row.try_get("user_message")?,
            assistant_message: row.try_get("assistant_message")?,
            model: row.try_get("model")?,
            created_at: row.try_get("created_at")?,
            expires_at: row.try_get("expires_at")?,
            token_estimate: row.try_get("token_estimate")?,
        })
    }

    fn into_turn(self) -> Result<ConversationTurn, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid turn id: {e}")))?;
        let created_at = parse_datetime(&self.created_at)?;
        let expires_at = parse_datetime(&self.expires_at)?;

        Ok(ConversationTurn {
            id,
            site_id: self.site_id,
            session_id: self.session_id,
            visitor_id: self.visitor_id,
            user_message: self.user_message,
            assistant_message: self.assistant_message,
            model: self.model,
            created_at,
            expires_at,
            token_estimate: self.token_estimate as u32,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

impl TurnRepository for SqliteTurnRepository {
    async fn append(&self, turn: &ConversationTurn) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO conversation_turns (id, site_id, session_id, visitor_id, user_message, assistant_message, model, created_at, expires_at, token_estimate)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(turn.id.to_string())
        .bind(&turn.site_id)
        .bind(&turn.session_id)
        .bind(&turn.visitor_id)
        .bind(&turn.user_message)
        .bind(&turn.assistant_message)
        .bind(&turn.model)
        .bind(format_datetime(&turn.created_at))
        .bind(format_datetime(&turn.expires_at))
        .bind(turn.token_estimate as i64)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn visitor_history(
        &self,
        site_id: &str,
        visitor_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<ConversationTurn>, RepositoryError> {
        // Expiry is enforced here, not just in the purge task: a row past
        // its expires_at must never reach context assembly.
        let rows = sqlx::query(
            r#"SELECT * FROM conversation_turns
               WHERE site_id = ? AND visitor_id = ? AND expires_at > ?
               ORDER BY created_at ASC"#,
        )
        .bind(site_id)
        .bind(visitor_id)
        .bind(format_datetime(&now))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut turns = Vec::with_capacity(rows.len());
        for row in &rows {
            let turn_row =
                TurnRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            turns.push(turn_row.into_turn()?);
        }

        Ok(turns)
    }

    async fn session_turn_count(&self, session_id: &str) -> Result<u32, RepositoryError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM conversation_turns WHERE session_id = ?")
                .bind(session_id)
                .fetch_one(&self.pool.reader)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(count.0 as u32)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM conversation_turns WHERE expires_at <= ?")
            .bind(format_datetime(&now))
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
