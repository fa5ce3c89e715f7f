//! Global server configuration parsed from `config.toml`.

use serde::{Deserialize, Serialize};

/// Tunables for the memory engine and completion provider.
///
/// Loaded from `{data_dir}/config.toml`; every field has a default so a
/// missing or partial file still yields a working configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Model requested from the completion provider.
    pub chat_model: String,
    /// Cap on generated tokens; replies are meant to be voice-friendly.
    pub max_response_tokens: u32,
    /// Sampling temperature for the completion provider.
    pub temperature: f64,
    /// Most recent turns injected as cross-session context.
    pub context_max_turns: usize,
    /// Token-estimate budget for injected context.
    pub context_token_budget: u32,
    /// Upper bound on a single provider call before falling back.
    pub provider_timeout_secs: u64,
    /// Interval between expired-turn purge sweeps.
    pub purge_interval_secs: u64,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            chat_model: "llama-3.1-8b-instant".to_string(),
            max_response_tokens: 150,
            temperature: 0.7,
            context_max_turns: 10,
            context_token_budget: 1_500,
            provider_timeout_secs: 15,
            purge_interval_secs: 3_600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let cfg = GlobalConfig::default();
        assert_eq!(cfg.chat_model, "llama-3.1-8b-instant");
        assert_eq!(cfg.max_response_tokens, 150);
        assert_eq!(cfg.context_max_turns, 10);
        assert_eq!(cfg.provider_timeout_secs, 15);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let cfg: GlobalConfig = toml::from_str("chat_model = \"llama-3.3-70b-versatile\"").unwrap();
        assert_eq!(cfg.chat_model, "llama-3.3-70b-versatile");
        assert_eq!(cfg.context_token_budget, 1_500);
    }
}
