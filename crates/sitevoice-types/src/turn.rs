//! Conversation turn types for the sitevoice memory engine.
//!
//! A turn is one user-message/assistant-reply pair, persisted with an
//! expiry. Turns are immutable once written; expired turns must never
//! influence a response.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How long a turn participates in cross-session context assembly.
pub const TURN_RETENTION_DAYS: i64 = 90;

/// One persisted user/assistant exchange.
///
/// `expires_at` is fixed at creation time (`created_at + 90 days`). The
/// memory engine excludes expired turns from every context query; the
/// purge task eventually removes the rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub id: Uuid,
    pub site_id: String,
    pub session_id: String,
    pub visitor_id: String,
    pub user_message: String,
    pub assistant_message: String,
    /// Model that produced the assistant message (or the fallback marker).
    pub model: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Rough token count of both messages, used for context budgeting.
    pub token_estimate: u32,
}

impl ConversationTurn {
    /// Build a new turn expiring [`TURN_RETENTION_DAYS`] after `created_at`.
    pub fn new(
        site_id: String,
        session_id: String,
        visitor_id: String,
        user_message: String,
        assistant_message: String,
        model: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        let token_estimate =
            estimate_tokens(&user_message) + estimate_tokens(&assistant_message);
        Self {
            id: Uuid::now_v7(),
            site_id,
            session_id,
            visitor_id,
            user_message,
            assistant_message,
            model,
            created_at,
            expires_at: created_at + Duration::days(TURN_RETENTION_DAYS),
            token_estimate,
        }
    }

    /// Whether this turn may still participate in context assembly.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Crude token estimate: one token per four characters, rounded up.
///
/// Good enough for context budgeting; the provider does its own exact
/// accounting.
pub fn estimate_tokens(text: &str) -> u32 {
    (text.chars().count() as u32).div_ceil(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_turn(created_at: DateTime<Utc>) -> ConversationTurn {
        ConversationTurn::new(
            "site-1".to_string(),
            "sess-1".to_string(),
            "visitor-1".to_string(),
            "Hello".to_string(),
            "Hi there!".to_string(),
            "llama-3.1-8b-instant".to_string(),
            created_at,
        )
    }

    #[test]
    fn test_expiry_is_ninety_days() {
        let created = Utc::now();
        let turn = sample_turn(created);
        assert_eq!(turn.expires_at - created, Duration::days(90));
    }

    #[test]
    fn test_is_live_boundaries() {
        let now = Utc::now();
        let fresh = sample_turn(now - Duration::days(89));
        let stale = sample_turn(now - Duration::days(91));
        assert!(fresh.is_live(now));
        assert!(!stale.is_live(now));
    }

    #[test]
    fn test_estimate_tokens_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn test_turn_serialize() {
        let turn = sample_turn(Utc::now());
        let json = serde_json::to_string(&turn).unwrap();
        assert!(json.contains("\"visitor_id\":\"visitor-1\""));
    }
}
