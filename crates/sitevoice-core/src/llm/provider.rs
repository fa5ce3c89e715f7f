//! CompletionProvider trait definition.
//!
//! The single abstraction between the memory engine and the upstream LLM.
//! Uses native async fn in traits (RPITIT, Rust 2024 edition); the
//! object-safe wrapper lives in [`super::box_provider`].

use sitevoice_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for completion backends (Groq, OpenAI-compatible gateways, ...).
///
/// Implementations live in sitevoice-infra (e.g., `GroqProvider`). Every
/// failure mode maps to [`LlmError`], which the memory engine treats as a
/// signal to route the request to the fallback responder.
pub trait CompletionProvider: Send + Sync {
    /// Human-readable provider name (e.g., "groq").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    ///
    /// Implementations must enforce a bounded timeout; a hung upstream
    /// must surface as [`LlmError::Timeout`], never block the caller.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
