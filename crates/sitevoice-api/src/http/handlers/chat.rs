//! Conversational chat endpoint.
//!
//! POST /api/chat
//!
//! Routes the message through the memory engine: identity resolution,
//! cross-session context assembly, completion (or fallback), and turn
//! persistence.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use sitevoice_core::memory::engine::RespondRequest;

use crate::http::error::AppError;
use crate::state::AppState;

/// Site id used when the embed script does not send one.
const DEFAULT_SITE_ID: &str = "default";

/// Request body for the chat endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user message. Required; whitespace-only is rejected.
    pub message: Option<String>,
    /// Existing session id to continue; if absent, a new session is minted.
    pub session_id: Option<String>,
    pub site_id: Option<String>,
    /// Durable visitor identity; minted and returned when absent.
    pub visitor_id: Option<String>,
}

/// Response body for the chat endpoint.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
    pub visitor_id: String,
    pub is_returning_visitor: bool,
    pub conversation_length: u32,
    pub model: String,
    pub timestamp: String,
}

/// POST /api/chat -- one conversational exchange.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let outcome = state
        .engine
        .respond(RespondRequest {
            site_id: body
                .site_id
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SITE_ID.to_string()),
            session_id: body.session_id,
            visitor_id: body.visitor_id,
            message: body.message.unwrap_or_default(),
        })
        .await?;

    Ok(Json(ChatResponse {
        response: outcome.response,
        session_id: outcome.session_id,
        visitor_id: outcome.visitor_id,
        is_returning_visitor: outcome.is_returning_visitor,
        conversation_length: outcome.conversation_length,
        model: outcome.model,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}
