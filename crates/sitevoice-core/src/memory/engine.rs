//! The memory engine: visitor resolution, context assembly, reply
//! production, and turn persistence.
//!
//! `respond` is the server-side contract behind the conversation API.
//! Each call is independent and stateless apart from reads/writes against
//! the turn store; concurrent calls for different visitors never contend.

use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use sitevoice_types::config::GlobalConfig;
use sitevoice_types::error::MemoryError;
use sitevoice_types::llm::{CompletionRequest, Message};
use sitevoice_types::turn::ConversationTurn;

use crate::llm::fallback::FALLBACK_MODEL;
use crate::llm::{BoxCompletionProvider, FallbackResponder};
use crate::memory::context::{ContextLimits, ContextWindow};
use crate::memory::store::TurnRepository;

/// Base system prompt; replies are kept brief and conversational so they
/// work when spoken aloud.
const SYSTEM_PROMPT: &str = "You are a helpful AI assistant embedded on a website. \
You should be friendly, concise, and helpful. Keep responses brief and \
conversational, suitable for voice interaction.";

const RETURNING_VISITOR_NOTE: &str = "This visitor has talked with you before; their \
previous exchanges are included above. You may reference them naturally (for \
example, welcoming the visitor back), but do not invent details that are not there.";

/// Incoming conversation request.
#[derive(Debug, Clone)]
pub struct RespondRequest {
    pub site_id: String,
    /// Ephemeral per-widget-instantiation thread; minted when absent.
    pub session_id: Option<String>,
    /// Durable visitor identity; minted and returned when absent.
    pub visitor_id: Option<String>,
    pub message: String,
}

/// Result of one `respond` call.
#[derive(Debug, Clone)]
pub struct RespondOutcome {
    pub response: String,
    pub session_id: String,
    pub visitor_id: String,
    pub is_returning_visitor: bool,
    /// Turns in this session including the one just recorded.
    pub conversation_length: u32,
    /// Model that produced the reply, or the fallback marker.
    pub model: String,
}

/// Tunables for one engine instance, derived from [`GlobalConfig`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub limits: ContextLimits,
    pub provider_timeout: Duration,
}

impl From<&GlobalConfig> for EngineConfig {
    fn from(cfg: &GlobalConfig) -> Self {
        Self {
            model: cfg.chat_model.clone(),
            max_tokens: cfg.max_response_tokens,
            temperature: cfg.temperature,
            limits: ContextLimits {
                max_turns: cfg.context_max_turns,
                token_budget: cfg.context_token_budget,
            },
            provider_timeout: Duration::from_secs(cfg.provider_timeout_secs),
        }
    }
}

/// Mint a new durable visitor identifier.
pub fn mint_visitor_id() -> String {
    format!("visitor-{}", Uuid::now_v7())
}

/// Orchestrates context assembly, completion, and turn persistence.
///
/// Generic over [`TurnRepository`] so the engine tests run against an
/// in-memory store; the API pins it to the SQLite implementation.
pub struct MemoryEngine<T: TurnRepository> {
    turns: T,
    provider: Option<BoxCompletionProvider>,
    fallback: FallbackResponder,
    config: EngineConfig,
}

impl<T: TurnRepository> MemoryEngine<T> {
    /// Create a new engine. `provider` is `None` when no credentials are
    /// configured; every request then goes through the fallback responder.
    pub fn new(turns: T, provider: Option<BoxCompletionProvider>, config: EngineConfig) -> Self {
        Self { turns, provider, fallback: FallbackResponder::new(), config }
    }

    /// Whether a completion provider is configured.
    pub fn provider_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Access the turn repository (used by the purge task).
    pub fn turns(&self) -> &T {
        &self.turns
    }

    /// Handle one conversation exchange.
    ///
    /// Fails only on invalid input. Provider failures route to the
    /// fallback responder; storage read failures degrade to a
    /// context-free conversation; storage write failures are logged and
    /// the reply is still returned (availability over completeness).
    pub async fn respond(&self, request: RespondRequest) -> Result<RespondOutcome, MemoryError> {
        let message = request.message.trim();
        if message.is_empty() {
            return Err(MemoryError::InvalidInput("Message is required".to_string()));
        }

        let session_id = request
            .session_id
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| Uuid::now_v7().to_string());
        let visitor_id = request
            .visitor_id
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(mint_visitor_id);

        let now = Utc::now();

        // Cross-session history, scoped to (site_id, visitor_id). A read
        // failure means we answer without memory rather than failing the
        // request.
        let history = match self
            .turns
            .visitor_history(&request.site_id, &visitor_id, now)
            .await
        {
            Ok(history) => history,
            Err(e) => {
                warn!(visitor_id = %visitor_id, error = %e, "history lookup failed, continuing without context");
                Vec::new()
            }
        };
        let is_returning_visitor = !history.is_empty();

        let window = ContextWindow::assemble(&history, self.config.limits);
        debug!(
            visitor_id = %visitor_id,
            turns = window.turns_included,
            returning = is_returning_visitor,
            "context assembled"
        );

        let (reply, model) = self
            .produce_reply(message, &window, is_returning_visitor)
            .await;

        let turn = ConversationTurn::new(
            request.site_id.clone(),
            session_id.clone(),
            visitor_id.clone(),
            message.to_string(),
            reply.clone(),
            model.clone(),
            now,
        );
        if let Err(e) = self.turns.append(&turn).await {
            warn!(session_id = %session_id, error = %e, "failed to persist turn");
        }

        let conversation_length = match self.turns.session_turn_count(&session_id).await {
            Ok(count) => count,
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "turn count lookup failed");
                1
            }
        };

        info!(
            session_id = %session_id,
            visitor_id = %visitor_id,
            model = %model,
            length = conversation_length,
            "conversation turn recorded"
        );

        Ok(RespondOutcome {
            response: reply,
            session_id,
            visitor_id,
            is_returning_visitor,
            conversation_length,
            model,
        })
    }

    /// Produce a reply via the provider, or the fallback responder when
    /// the provider is absent, errors, or exceeds its timeout.
    async fn produce_reply(
        &self,
        message: &str,
        window: &ContextWindow,
        is_returning_visitor: bool,
    ) -> (String, String) {
        let Some(provider) = &self.provider else {
            return (self.fallback.respond(message).to_string(), FALLBACK_MODEL.to_string());
        };

        let mut system = SYSTEM_PROMPT.to_string();
        if is_returning_visitor {
            system.push_str("\n\n");
            system.push_str(RETURNING_VISITOR_NOTE);
        }

        let mut messages = window.messages.clone();
        messages.push(Message::user(message));

        let completion = CompletionRequest {
            model: self.config.model.clone(),
            messages,
            system: Some(system),
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
        };

        match tokio::time::timeout(self.config.provider_timeout, provider.complete(&completion))
            .await
        {
            Ok(Ok(response)) => (response.content, response.model),
            Ok(Err(e)) => {
                warn!(provider = provider.name(), error = %e, "provider failed, using fallback responder");
                (self.fallback.respond(message).to_string(), FALLBACK_MODEL.to_string())
            }
            Err(_) => {
                warn!(provider = provider.name(), "provider timed out, using fallback responder");
                (self.fallback.respond(message).to_string(), FALLBACK_MODEL.to_string())
            }
        }
    }
}
