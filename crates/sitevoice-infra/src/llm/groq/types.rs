//! Groq chat completions API types.
//!
//! Wire structures for the OpenAI-compatible `/chat/completions` endpoint.
//! They are NOT the generic completion types from sitevoice-types -- those
//! are provider-agnostic.

use serde::{Deserialize, Serialize};

/// Request body for the chat completions endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GroqChatRequest {
    pub model: String,
    pub messages: Vec<GroqMessage>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// A single message in a chat completions conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroqMessage {
    pub role: String,
    pub content: String,
}

/// Response body for a non-streaming chat completion.
#[derive(Debug, Clone, Deserialize)]
pub struct GroqChatResponse {
    pub model: String,
    pub choices: Vec<GroqChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroqChoice {
    pub message: GroqMessage,
}
