//! Conversational memory: visitor context assembly and turn persistence.

pub mod context;
pub mod engine;
pub mod store;

pub use engine::{MemoryEngine, RespondOutcome, RespondRequest};
pub use store::{TurnRepository, WidgetConfigRepository};
