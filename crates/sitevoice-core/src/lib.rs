//! Business logic for the sitevoice widget core.
//!
//! Three pillars:
//! - `dialogue` -- the client-side state machine coordinating speech
//!   capture, speech synthesis, and conversation requests.
//! - `memory` -- visitor identity resolution, cross-session context
//!   assembly, and turn persistence with a 90-day horizon.
//! - `llm` -- the completion provider abstraction and the rule-based
//!   fallback responder used when no provider is reachable.
//!
//! This crate defines repository and capability traits only; concrete
//! implementations (SQLite, Groq, browser bindings) live in sitevoice-infra.

pub mod dialogue;
pub mod event;
pub mod llm;
pub mod memory;
