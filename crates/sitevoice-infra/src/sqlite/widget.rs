//! SQLite widget configuration repository.

use chrono::Utc;
use sqlx::Row;

use sitevoice_core::memory::store::WidgetConfigRepository;
use sitevoice_types::error::RepositoryError;
use sitevoice_types::widget::{WidgetConfig, WidgetPosition, WidgetTheme};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `WidgetConfigRepository`.
pub struct SqliteWidgetConfigRepository {
    pool: DatabasePool,
}

impl SqliteWidgetConfigRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct WidgetConfigRow {
    site_id: String,
    greeting_message: String,
    bot_name: String,
    primary_color: String,
    secondary_color: String,
    text_color: String,
    background_color: String,
    position: String,
    auto_greet: i64,
    voice_enabled: i64,
    language: String,
}

impl WidgetConfigRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            site_id: row.try_get("site_id")?,
            greeting_message: row.try_get("greeting_message")?,
            bot_name: row.try_get("bot_name")?,
            primary_color: row.try_get("primary_color")?,
            secondary_color: row.try_get("secondary_color")?,
            text_color: row.try_get("text_color")?,
            background_color: row.try_get("background_color")?,
            position: row.try_get("position")?,
            auto_greet: row.try_get("auto_greet")?,
            voice_enabled: row.try_get("voice_enabled")?,
            language: row.try_get("language")?,
        })
    }

    fn into_config(self) -> Result<WidgetConfig, RepositoryError> {
        let position: WidgetPosition = self
            .position
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(WidgetConfig {
            site_id: self.site_id,
            greeting_message: self.greeting_message,
            bot_name: self.bot_name,
            theme: WidgetTheme {
                primary_color: self.primary_color,
                secondary_color: self.secondary_color,
                text_color: self.text_color,
                background_color: self.background_color,
            },
            position,
            auto_greet: self.auto_greet != 0,
            voice_enabled: self.voice_enabled != 0,
            language: self.language,
        })
    }
}

impl WidgetConfigRepository for SqliteWidgetConfigRepository {
    async fn get(&self, site_id: &str) -> Result<Option<WidgetConfig>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM widget_configs WHERE site_id = ?")
            .bind(site_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let config_row = WidgetConfigRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(config_row.into_config()?))
            }
            None => Ok(None),
        }
    }

    async fn upsert(&self, config: &WidgetConfig) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO widget_configs (site_id, greeting_message, bot_name, primary_color, secondary_color, text_color, background_color, position, auto_greet, voice_enabled, language, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(site_id) DO UPDATE SET
                   greeting_message = excluded.greeting_message,
                   bot_name = excluded.bot_name,
                   primary_color = excluded.primary_color,
                   secondary_color = excluded.secondary_color,
                   text_color = excluded.text_color,
                   background_color = excluded.background_color,
                   position = excluded.position,
                   auto_greet = excluded.auto_greet,
                   voice_enabled = excluded.voice_enabled,
                   language = excluded.language,
                   updated_at = excluded.updated_at"#,
        )
        .bind(&config.site_id)
        .bind(&config.greeting_message)
        .bind(&config.bot_name)
        .bind(&config.theme.primary_color)
        .bind(&config.theme.secondary_color)
        .bind(&config.theme.text_color)
        .bind(&config.theme.background_color)
        .bind(config.position.to_string())
        .bind(if config.auto_greet { 1i64 } else { 0i64 })
        .bind(if config.voice_enabled { 1i64 } else { 0i64 })
        .bind(&config.language)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }
}
