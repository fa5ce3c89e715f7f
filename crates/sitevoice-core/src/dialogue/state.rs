//! Dialogue events, effects, and user-facing failure messages.
//!
//! Events are the inputs to the orchestrator state machine (user actions,
//! capability callbacks, request results). Effects are the outputs: the
//! driver executes them against the injected capabilities. Expressing
//! transitions as event -> (state, effects) keeps the machine
//! deterministic and testable without a DOM.

use std::time::Duration;

use sitevoice_types::error::{CaptureError, RequestError};
use sitevoice_types::interaction::InteractionKind;

/// Delay between widget-open and the auto-greeting, letting the panel render.
pub const GREETING_DELAY: Duration = Duration::from_millis(500);

/// Inputs to the dialogue state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogueEvent {
    /// Host page finished loading; the widget may attempt the spoken
    /// greeting even before the panel is opened.
    PageLoaded,
    /// First user gesture on the host page after an autoplay block.
    GestureFired,
    ToggleOpen,
    ToggleClose,
    /// The scheduled greeting timer fired.
    GreetingDue,
    MicPressed,
    /// User cancelled an active capture.
    CancelPressed,
    /// User stopped playback explicitly.
    StopPressed,
    /// Final recognition result.
    TranscriptFinal(String),
    /// Recognition ended without a final result.
    CaptureEnded,
    CaptureFailed(CaptureError),
    /// User submitted a typed message.
    TypedMessage(String),
    ReplyReceived(String),
    ReplyFailed(RequestError),
    SynthesisStarted,
    /// Playback silently refused (autoplay policy).
    SynthesisBlocked,
    SynthesisFinished,
    SynthesisFailed,
    /// The error state has been surfaced; return to idle.
    ErrorCleared,
}

/// Side effects requested by a transition, executed in order by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartCapture,
    StopCapture,
    Speak(String),
    CancelSpeech,
    SendMessage(String),
    RenderUserMessage(String),
    RenderAssistantMessage(String),
    RenderSystemMessage(String),
    ScheduleGreeting(Duration),
    ArmGestureRetry,
    DisarmGestures,
    Emit(InteractionKind),
}

/// User-facing system message for a capture failure.
pub fn capture_message(error: &CaptureError) -> String {
    match error {
        CaptureError::PermissionDenied => {
            "Microphone access denied. Please check your browser settings.".to_string()
        }
        CaptureError::NoSpeech => {
            "I didn't hear anything. Tap the microphone and try again.".to_string()
        }
        CaptureError::Aborted => {
            "Voice input was interrupted. Tap the microphone to try again.".to_string()
        }
        CaptureError::Network => {
            "Voice input failed due to a network problem. Please check your connection."
                .to_string()
        }
        CaptureError::Unavailable => {
            "Voice input isn't supported in this browser.".to_string()
        }
    }
}

/// User-facing system message for a failed conversation request.
pub fn request_message(error: &RequestError) -> String {
    match error {
        RequestError::Timeout | RequestError::Network => {
            "I couldn't reach the assistant. Please check your connection and try again."
                .to_string()
        }
        RequestError::Server(_) => {
            "Something went wrong on our end. Please try again in a moment.".to_string()
        }
    }
}
