//! The client-side dialogue orchestrator.
//!
//! A widget embed constructs one [`orchestrator::DialogueOrchestrator`]
//! per instantiation. The orchestrator is a pure state machine: feeding it
//! a [`state::DialogueEvent`] returns the list of [`state::Effect`]s to
//! perform, and the [`driver::DialogueDriver`] executes those effects
//! against injected capability traits. Browser speech globals never leak
//! past the trait seams, so the whole machine tests with fakes.

pub mod capability;
pub mod driver;
pub mod gesture;
pub mod identity;
pub mod orchestrator;
pub mod state;

pub use capability::{CapabilityProbe, SpeechCapabilities, SpeechCapture, SpeechOutput};
pub use driver::{ConversationClient, DialogueDriver};
pub use identity::{InMemoryIdentityStore, VisitorIdentityStore};
pub use orchestrator::DialogueOrchestrator;
pub use state::{DialogueEvent, Effect};
