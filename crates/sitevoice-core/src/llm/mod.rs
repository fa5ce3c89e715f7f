//! Completion provider abstraction and fallback responder.

pub mod box_provider;
pub mod fallback;
pub mod provider;

pub use box_provider::BoxCompletionProvider;
pub use fallback::FallbackResponder;
pub use provider::CompletionProvider;
