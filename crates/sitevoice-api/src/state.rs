//! Application state wiring the memory engine and repositories together.
//!
//! The memory engine is generic over its turn repository; AppState pins it
//! to the concrete SQLite implementation.

use std::path::PathBuf;
use std::sync::Arc;

use sitevoice_core::memory::engine::{EngineConfig, MemoryEngine};
use sitevoice_infra::config::load_global_config;
use sitevoice_infra::llm::provider_from_env;
use sitevoice_infra::sqlite::interaction::SqliteInteractionRepository;
use sitevoice_infra::sqlite::pool::{default_data_dir, DatabasePool};
use sitevoice_infra::sqlite::turn::SqliteTurnRepository;
use sitevoice_infra::sqlite::widget::SqliteWidgetConfigRepository;
use sitevoice_types::config::GlobalConfig;

/// Concrete type alias for the engine generic pinned to SQLite.
pub type ConcreteMemoryEngine = MemoryEngine<SqliteTurnRepository>;

/// Shared application state for the REST handlers and background tasks.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ConcreteMemoryEngine>,
    pub widget_configs: Arc<SqliteWidgetConfigRepository>,
    pub interactions: SqliteInteractionRepository,
    pub config: GlobalConfig,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: connect to the DB, load config,
    /// and wire the engine.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = PathBuf::from(default_data_dir());
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_global_config(&data_dir).await;

        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("sitevoice.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        let provider = provider_from_env()?;
        if provider.is_none() {
            tracing::warn!("GROQ_API_KEY not set; serving rule-based fallback responses only");
        }

        let engine = MemoryEngine::new(
            SqliteTurnRepository::new(db_pool.clone()),
            provider,
            EngineConfig::from(&config),
        );

        Ok(Self {
            engine: Arc::new(engine),
            widget_configs: Arc::new(SqliteWidgetConfigRepository::new(db_pool.clone())),
            interactions: SqliteInteractionRepository::new(db_pool.clone()),
            config,
            data_dir,
            db_pool,
        })
    }
}
