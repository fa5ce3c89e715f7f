//! Interaction analytics endpoint.
//!
//! POST /api/analytics/interaction
//!
//! Fire-and-forget: the widget never waits on analytics, and a storage
//! failure or malformed kind still yields `{"status": "logged"}`.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use sitevoice_core::event::sink::InteractionSink;
use sitevoice_types::interaction::{InteractionEvent, InteractionKind};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InteractionRequest {
    pub site_id: Option<String>,
    pub session_id: Option<String>,
    /// One of the `InteractionKind` wire names (e.g. "voice_input").
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// POST /api/analytics/interaction -- record a widget interaction.
pub async fn log_interaction(
    State(state): State<AppState>,
    Json(body): Json<InteractionRequest>,
) -> Json<Value> {
    let kind = body.kind.as_deref().and_then(|k| k.parse::<InteractionKind>().ok());

    match kind {
        Some(kind) => {
            state
                .interactions
                .record(InteractionEvent::new(
                    body.site_id.unwrap_or_default(),
                    body.session_id.unwrap_or_default(),
                    kind,
                ))
                .await;
        }
        None => {
            tracing::debug!(kind = ?body.kind, "ignoring interaction with unknown type");
        }
    }

    Json(json!({ "status": "logged" }))
}
