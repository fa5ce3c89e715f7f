//! Rule-based fallback responder.
//!
//! Used whenever the completion provider fails or no credentials are
//! configured. Classifies the incoming message against an ordered set of
//! intent buckets using case-insensitive keyword matching and returns a
//! fixed template per bucket. Deterministic: the same message always maps
//! to the same intent and the same response text.

use std::fmt;

/// Model name recorded on turns answered by the fallback responder.
pub const FALLBACK_MODEL: &str = "fallback-rules";

/// Intent bucket for an incoming visitor message.
///
/// Classification checks buckets in declaration order and takes the first
/// bucket with a keyword hit, so overlapping keywords resolve consistently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    Farewell,
    Help,
    Product,
    Navigation,
    Contact,
    Unmatched,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Greeting => write!(f, "greeting"),
            Intent::Farewell => write!(f, "farewell"),
            Intent::Help => write!(f, "help"),
            Intent::Product => write!(f, "product"),
            Intent::Navigation => write!(f, "navigation"),
            Intent::Contact => write!(f, "contact"),
            Intent::Unmatched => write!(f, "unmatched"),
        }
    }
}

/// Ordered keyword table. First bucket with a substring hit wins.
const INTENT_KEYWORDS: &[(Intent, &[&str])] = &[
    (
        Intent::Greeting,
        &["hello", "hi ", "hi!", "hi?", "hey", "good morning", "good afternoon", "good evening"],
    ),
    (Intent::Farewell, &["bye", "goodbye", "see you", "thanks, that's all", "that's all"]),
    (
        Intent::Help,
        &["help", "support", "problem", "issue", "error", "trouble", "how do i", "how to", "stuck"],
    ),
    (
        Intent::Product,
        &["product", "service", "buy", "purchase", "price", "pricing", "cost", "features", "plan", "demo"],
    ),
    (
        Intent::Navigation,
        &["find", "where", "locate", "navigate", "looking for", "page", "section", "menu", "link"],
    ),
    (
        Intent::Contact,
        &["contact", "phone", "email", "address", "location", "office", "sales team", "representative"],
    ),
];

/// Deterministic canned responder for provider outages.
#[derive(Debug, Default, Clone)]
pub struct FallbackResponder;

impl FallbackResponder {
    pub fn new() -> Self {
        Self
    }

    /// Classify a message into an intent bucket.
    pub fn classify(&self, message: &str) -> Intent {
        let normalized = format!("{} ", message.trim().to_lowercase());
        for (intent, keywords) in INTENT_KEYWORDS {
            if keywords.iter().any(|kw| normalized.contains(kw)) {
                return *intent;
            }
        }
        Intent::Unmatched
    }

    /// Produce the canned response template for a message.
    pub fn respond(&self, message: &str) -> &'static str {
        match self.classify(message) {
            Intent::Greeting => {
                "Hello! I'm the assistant for this site. I can answer questions, \
                 point you to the right page, or help you get in touch. What can I do for you?"
            }
            Intent::Farewell => {
                "Thanks for stopping by! If anything else comes up, just open this chat again."
            }
            Intent::Help => {
                "I'd be happy to help. Could you describe what you're trying to do? \
                 You can also check the site's help or FAQ section for common questions."
            }
            Intent::Product => {
                "Great question! You can find details about products, pricing, and plans \
                 on this site's product pages. Is there something specific you'd like to know?"
            }
            Intent::Navigation => {
                "Let me point you in the right direction. Try the site's main menu or \
                 search -- and tell me what you're looking for so I can narrow it down."
            }
            Intent::Contact => {
                "You can reach the team through the contact page on this site, which lists \
                 phone, email, and office details. Would you like help with anything else?"
            }
            Intent::Unmatched => {
                "I'm here to help you find what you need on this site. Could you tell me \
                 a bit more about what you're looking for?"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_classification() {
        let responder = FallbackResponder::new();
        assert_eq!(responder.classify("Hello, how can you help me?"), Intent::Greeting);
        assert_eq!(responder.classify("hey there"), Intent::Greeting);
    }

    #[test]
    fn test_help_classification() {
        let responder = FallbackResponder::new();
        assert_eq!(responder.classify("I have a problem with my order"), Intent::Help);
        assert_eq!(responder.classify("How do I reset my password"), Intent::Help);
    }

    #[test]
    fn test_product_and_navigation() {
        let responder = FallbackResponder::new();
        assert_eq!(responder.classify("what does the premium plan cost?"), Intent::Product);
        assert_eq!(responder.classify("where is the downloads section"), Intent::Navigation);
    }

    #[test]
    fn test_unmatched_falls_through() {
        let responder = FallbackResponder::new();
        assert_eq!(responder.classify("xyzzy plugh"), Intent::Unmatched);
    }

    #[test]
    fn test_ordering_greeting_beats_help() {
        // "hello" appears before any help keyword in the table, so a message
        // containing both resolves to Greeting.
        let responder = FallbackResponder::new();
        assert_eq!(responder.classify("hello, I need support"), Intent::Greeting);
    }

    #[test]
    fn test_determinism() {
        let responder = FallbackResponder::new();
        let message = "Hello, how can you help me?";
        let first = responder.respond(message);
        for _ in 0..10 {
            assert_eq!(responder.respond(message), first);
        }
    }

    #[test]
    fn test_case_insensitive() {
        let responder = FallbackResponder::new();
        assert_eq!(
            responder.respond("HELLO THERE"),
            responder.respond("hello there")
        );
    }
}
