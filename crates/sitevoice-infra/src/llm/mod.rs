//! Completion provider implementations.
//!
//! Concrete implementations of the [`CompletionProvider`] trait defined in
//! `sitevoice-core`. Groq is the only HTTP provider; when no credentials
//! are configured the memory engine runs entirely on its rule-based
//! fallback responder.
//!
//! [`CompletionProvider`]: sitevoice_core::llm::provider::CompletionProvider

pub mod groq;

use secrecy::SecretString;

use sitevoice_core::llm::box_provider::BoxCompletionProvider;
use sitevoice_types::llm::LlmError;

use self::groq::GroqProvider;

/// Environment variable holding the Groq API key.
pub const GROQ_API_KEY_VAR: &str = "GROQ_API_KEY";

/// Build the Groq provider from the environment, if credentials exist.
///
/// Returns `Ok(None)` when `GROQ_API_KEY` is unset or blank; the caller
/// degrades to fallback-only operation rather than failing startup.
pub fn provider_from_env() -> Result<Option<BoxCompletionProvider>, LlmError> {
    match std::env::var(GROQ_API_KEY_VAR) {
        Ok(key) if !key.trim().is_empty() => {
            let secret = SecretString::from(key);
            Ok(Some(BoxCompletionProvider::new(GroqProvider::new(secret))))
        }
        _ => Ok(None),
    }
}
