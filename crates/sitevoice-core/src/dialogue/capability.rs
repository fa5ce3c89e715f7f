//! Speech capability traits and detection.
//!
//! Browser speech objects are global singletons; wrapping them behind
//! these traits keeps the orchestrator testable and lets non-browser
//! embedders plug in their own audio stack.

use sitevoice_types::error::{CaptureError, SynthesisError};

/// What the runtime's audio stack supports. Pure query, no state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeechCapabilities {
    /// Speech-to-text capture is available.
    pub recognition: bool,
    /// Text-to-speech playback is available.
    pub synthesis: bool,
}

impl SpeechCapabilities {
    /// Neither subsystem available; the widget runs text-only.
    pub const fn none() -> Self {
        Self { recognition: false, synthesis: false }
    }

    pub const fn full() -> Self {
        Self { recognition: true, synthesis: true }
    }
}

/// Probes the runtime for speech support.
pub trait CapabilityProbe {
    fn probe(&self) -> SpeechCapabilities;
}

/// Speech-to-text capture, one utterance at a time (continuous mode off).
///
/// `start` performs the permission gate: a denied microphone surfaces as
/// [`CaptureError::PermissionDenied`] before any audio flows. Recognition
/// results and end-of-speech arrive as dialogue events fed by the embedder.
pub trait SpeechCapture: Send {
    /// Begin a capture attempt, resolving permissions first.
    fn start(&mut self) -> impl std::future::Future<Output = Result<(), CaptureError>> + Send;

    /// Cancel any active capture. Idempotent.
    fn stop(&mut self);
}

/// Text-to-speech playback.
///
/// `speak` returns [`SynthesisError::Blocked`] when the runtime refuses
/// playback without a prior user gesture (autoplay policy); the
/// orchestrator handles that case with a one-shot gesture retry rather
/// than treating it as a hard error.
pub trait SpeechOutput: Send {
    /// Start speaking an utterance in the given language.
    fn speak(&mut self, text: &str, language: &str) -> Result<(), SynthesisError>;

    /// Cancel any in-flight utterance. Idempotent.
    fn cancel(&mut self);
}
