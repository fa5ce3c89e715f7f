//! Widget configuration endpoint.
//!
//! POST /api/widget/config
//!
//! Serves the per-site widget configuration. A stored override replaces
//! the hardcoded default wholesale; fetch failures degrade to the default
//! rather than erroring, since the widget must always be able to boot.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use sitevoice_core::memory::store::WidgetConfigRepository;
use sitevoice_types::widget::WidgetConfig;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WidgetConfigRequest {
    pub site_id: Option<String>,
}

/// POST /api/widget/config -- configuration for one site.
pub async fn widget_config(
    State(state): State<AppState>,
    Json(body): Json<WidgetConfigRequest>,
) -> Result<Json<WidgetConfig>, AppError> {
    let site_id = body
        .site_id
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Site ID is required".to_string()))?;

    let config = match state.widget_configs.get(&site_id).await {
        Ok(Some(stored)) => stored,
        Ok(None) => WidgetConfig::default_for_site(&site_id),
        Err(error) => {
            tracing::warn!(%error, %site_id, "widget config fetch failed, serving default");
            WidgetConfig::default_for_site(&site_id)
        }
    };

    Ok(Json(config))
}
