//! Interaction analytics event types.
//!
//! Interaction events are best-effort telemetry emitted on dialogue state
//! transitions of interest. Sink failures must never affect dialogue state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Kind of widget interaction being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    WidgetOpened,
    WidgetClosed,
    Greeting,
    VoiceInput,
    TextInput,
    AiResponse,
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InteractionKind::WidgetOpened => write!(f, "widget_opened"),
            InteractionKind::WidgetClosed => write!(f, "widget_closed"),
            InteractionKind::Greeting => write!(f, "greeting"),
            InteractionKind::VoiceInput => write!(f, "voice_input"),
            InteractionKind::TextInput => write!(f, "text_input"),
            InteractionKind::AiResponse => write!(f, "ai_response"),
        }
    }
}

impl FromStr for InteractionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "widget_opened" => Ok(InteractionKind::WidgetOpened),
            "widget_closed" => Ok(InteractionKind::WidgetClosed),
            "greeting" => Ok(InteractionKind::Greeting),
            "voice_input" => Ok(InteractionKind::VoiceInput),
            "text_input" => Ok(InteractionKind::TextInput),
            "ai_response" => Ok(InteractionKind::AiResponse),
            other => Err(format!("invalid interaction kind: '{other}'")),
        }
    }
}

/// A single recorded interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub id: Uuid,
    pub site_id: String,
    pub session_id: String,
    pub kind: InteractionKind,
    pub created_at: DateTime<Utc>,
}

impl InteractionEvent {
    pub fn new(site_id: String, session_id: String, kind: InteractionKind) -> Self {
        Self {
            id: Uuid::now_v7(),
            site_id,
            session_id,
            kind,
            created_at: Utc::now(),
        }
    }
}
