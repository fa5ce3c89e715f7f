//! GroqProvider -- concrete [`CompletionProvider`] implementation for the
//! Groq OpenAI-compatible chat completions API.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

mod types;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use sitevoice_core::llm::provider::CompletionProvider;
use sitevoice_types::llm::{CompletionRequest, CompletionResponse, LlmError, Message};

use self::types::{GroqChatRequest, GroqChatResponse, GroqMessage};

/// Default request timeout. The memory engine applies its own, tighter
/// deadline on top of this.
const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

/// Groq chat completions provider.
pub struct GroqProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl GroqProvider {
    pub fn new(api_key: SecretString) -> Self {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://api.groq.com/openai/v1".to_string(),
        }
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn to_groq_request(request: &CompletionRequest) -> GroqChatRequest {
        // The chat completions API takes the system prompt as a leading
        // message rather than a separate field.
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system {
            messages.push(GroqMessage { role: "system".to_string(), content: system.clone() });
        }
        messages.extend(request.messages.iter().map(GroqMessage::from_message));

        GroqChatRequest {
            model: request.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

// GroqProvider intentionally does NOT derive Debug; the SecretString field
// already refuses to print, and omitting Debug removes the temptation.

impl CompletionProvider for GroqProvider {
    fn name(&self) -> &str {
        "groq"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = Self::to_groq_request(request);
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Provider { message: format!("HTTP request failed: {e}") }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => LlmError::AuthenticationFailed,
                _ => LlmError::Provider { message: format!("HTTP {status}: {error_body}") },
            });
        }

        let groq_resp: GroqChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let content = groq_resp
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| LlmError::Deserialization("response had no choices".to_string()))?;

        Ok(CompletionResponse { content, model: groq_resp.model })
    }
}

impl GroqMessage {
    fn from_message(message: &Message) -> Self {
        Self { role: message.role.to_string(), content: message.content.clone() }
    }
}
