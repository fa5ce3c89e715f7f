//! Widget configuration and dialogue state types.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// States of the client-side dialogue orchestrator.
///
/// Exactly one state is active per widget instance. `Listening` and
/// `Speaking` are mutually exclusive by construction: entering either one
/// cancels the other subsystem first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueState {
    Closed,
    OpenIdle,
    Listening,
    Processing,
    Speaking,
    Error,
}

impl fmt::Display for DialogueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialogueState::Closed => write!(f, "closed"),
            DialogueState::OpenIdle => write!(f, "open_idle"),
            DialogueState::Listening => write!(f, "listening"),
            DialogueState::Processing => write!(f, "processing"),
            DialogueState::Speaking => write!(f, "speaking"),
            DialogueState::Error => write!(f, "error"),
        }
    }
}

/// Widget placement corner on the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetPosition {
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

impl fmt::Display for WidgetPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetPosition::BottomRight => write!(f, "bottom-right"),
            WidgetPosition::BottomLeft => write!(f, "bottom-left"),
            WidgetPosition::TopRight => write!(f, "top-right"),
            WidgetPosition::TopLeft => write!(f, "top-left"),
        }
    }
}

impl FromStr for WidgetPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bottom-right" => Ok(WidgetPosition::BottomRight),
            "bottom-left" => Ok(WidgetPosition::BottomLeft),
            "top-right" => Ok(WidgetPosition::TopRight),
            "top-left" => Ok(WidgetPosition::TopLeft),
            other => Err(format!("invalid widget position: '{other}'")),
        }
    }
}

/// Widget theme colors (hex strings as shipped to the embed script).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetTheme {
    pub primary_color: String,
    pub secondary_color: String,
    pub text_color: String,
    pub background_color: String,
}

impl Default for WidgetTheme {
    fn default() -> Self {
        Self {
            primary_color: "#3B82F6".to_string(),
            secondary_color: "#1E40AF".to_string(),
            text_color: "#1F2937".to_string(),
            background_color: "#FFFFFF".to_string(),
        }
    }
}

/// Per-site widget configuration consumed (never mutated) by the
/// dialogue orchestrator.
///
/// The default value is served whenever a site has no stored override or
/// the config fetch fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    pub site_id: String,
    pub greeting_message: String,
    pub bot_name: String,
    pub theme: WidgetTheme,
    pub position: WidgetPosition,
    pub auto_greet: bool,
    pub voice_enabled: bool,
    pub language: String,
}

impl WidgetConfig {
    /// Hardcoded default configuration for a site.
    pub fn default_for_site(site_id: &str) -> Self {
        Self {
            site_id: site_id.to_string(),
            greeting_message:
                "Hi there! I'm your virtual assistant. How can I help you today?".to_string(),
            bot_name: "AI Assistant".to_string(),
            theme: WidgetTheme::default(),
            position: WidgetPosition::BottomRight,
            auto_greet: true,
            voice_enabled: true,
            language: "en-US".to_string(),
        }
    }
}
