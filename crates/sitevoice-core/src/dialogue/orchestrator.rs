//! The dialogue orchestrator state machine.
//!
//! One instance per widget embed, owning its [`DialogueState`] exclusively.
//! `handle` consumes an event and returns the effects to perform; the
//! machine itself never touches audio, network, or the DOM.
//!
//! Invariants enforced here:
//! - exactly one state active at a time (single enum field);
//! - `Listening` and `Speaking` are mutually exclusive: every transition
//!   into `Listening` emits `CancelSpeech` first, and `Speak` is never
//!   emitted while capture is active;
//! - at most one conversational request in flight: input arriving while
//!   `Processing` is queued, never interleaved;
//! - the auto-greeting is spoken at most once per instantiation.

use std::collections::VecDeque;

use tracing::debug;

use sitevoice_types::interaction::InteractionKind;
use sitevoice_types::widget::{DialogueState, WidgetConfig};

use super::capability::SpeechCapabilities;
use super::gesture::OneShotGesture;
use super::state::{
    capture_message, request_message, DialogueEvent, Effect, GREETING_DELAY,
};

/// Client state machine coordinating capture, synthesis, and API calls.
pub struct DialogueOrchestrator {
    state: DialogueState,
    config: WidgetConfig,
    caps: SpeechCapabilities,
    /// The greeting has been delivered (spoken or rendered) this instantiation.
    has_greeted: bool,
    /// A greeting timer is outstanding.
    greeting_scheduled: bool,
    /// The utterance currently starting in the synthesizer is the greeting.
    greeting_in_flight: bool,
    gesture: OneShotGesture,
    /// Messages typed while a request was already in flight.
    pending: VecDeque<String>,
}

impl DialogueOrchestrator {
    pub fn new(config: WidgetConfig, caps: SpeechCapabilities) -> Self {
        Self {
            state: DialogueState::Closed,
            config,
            caps,
            has_greeted: false,
            greeting_scheduled: false,
            greeting_in_flight: false,
            gesture: OneShotGesture::new(),
            pending: VecDeque::new(),
        }
    }

    pub fn state(&self) -> DialogueState {
        self.state
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Whether the greeting has been delivered this instantiation.
    pub fn has_greeted(&self) -> bool {
        self.has_greeted
    }

    /// Feed an event through the machine, returning the effects to run.
    pub fn handle(&mut self, event: DialogueEvent) -> Vec<Effect> {
        let before = self.state;
        let effects = self.transition(event);
        if self.state != before {
            debug!(from = %before, to = %self.state, "dialogue transition");
        }
        effects
    }

    /// Release the instance: cancel audio both ways and drop listeners.
    ///
    /// The driver runs these effects and then discards the orchestrator;
    /// nothing may be fed to `handle` afterwards.
    pub fn destroy(&mut self) -> Vec<Effect> {
        self.state = DialogueState::Closed;
        self.pending.clear();
        self.gesture.disarm();
        vec![Effect::CancelSpeech, Effect::StopCapture, Effect::DisarmGestures]
    }

    fn transition(&mut self, event: DialogueEvent) -> Vec<Effect> {
        use DialogueEvent as E;
        use DialogueState as S;

        match event {
            E::PageLoaded => {
                // Speculative spoken greeting before any gesture; autoplay
                // policy may refuse it, which arrives as SynthesisBlocked.
                if self.config.auto_greet
                    && self.config.voice_enabled
                    && self.caps.synthesis
                    && !self.has_greeted
                {
                    self.greeting_in_flight = true;
                    vec![Effect::Speak(self.config.greeting_message.clone())]
                } else {
                    Vec::new()
                }
            }

            E::GestureFired => {
                if self.gesture.fire() && !self.has_greeted {
                    self.greeting_in_flight = true;
                    vec![
                        Effect::Speak(self.config.greeting_message.clone()),
                        Effect::DisarmGestures,
                    ]
                } else {
                    vec![Effect::DisarmGestures]
                }
            }

            E::ToggleOpen => {
                if self.state != S::Closed {
                    return Vec::new();
                }
                self.state = S::OpenIdle;
                let mut effects = vec![Effect::Emit(InteractionKind::WidgetOpened)];
                if self.config.auto_greet && !self.has_greeted && !self.greeting_scheduled {
                    self.greeting_scheduled = true;
                    effects.push(Effect::ScheduleGreeting(GREETING_DELAY));
                }
                effects
            }

            E::GreetingDue => {
                self.greeting_scheduled = false;
                if self.has_greeted || self.state == S::Closed {
                    return Vec::new();
                }
                self.has_greeted = true;
                let greeting = self.config.greeting_message.clone();
                let mut effects = vec![
                    Effect::RenderAssistantMessage(greeting.clone()),
                    Effect::Emit(InteractionKind::Greeting),
                ];
                if self.config.voice_enabled && self.caps.synthesis && self.state == S::OpenIdle
                {
                    self.state = S::Speaking;
                    effects.push(Effect::Speak(greeting));
                }
                effects
            }

            E::ToggleClose => {
                if self.state == S::Closed {
                    return Vec::new();
                }
                // Closing must not leave audio playing or the mic hot.
                self.state = S::Closed;
                self.pending.clear();
                self.greeting_scheduled = false;
                vec![
                    Effect::CancelSpeech,
                    Effect::StopCapture,
                    Effect::Emit(InteractionKind::WidgetClosed),
                ]
            }

            E::MicPressed => {
                if !self.caps.recognition {
                    return Vec::new();
                }
                match self.state {
                    // Starting capture cancels any active synthesis first;
                    // otherwise the mic picks up the assistant's own voice.
                    S::OpenIdle | S::Speaking => {
                        self.state = S::Listening;
                        vec![Effect::CancelSpeech, Effect::StartCapture]
                    }
                    _ => Vec::new(),
                }
            }

            E::TranscriptFinal(text) => {
                if self.state != S::Listening {
                    return Vec::new();
                }
                let text = text.trim().to_string();
                if text.is_empty() {
                    self.state = S::OpenIdle;
                    return vec![Effect::StopCapture];
                }
                self.state = S::Processing;
                vec![
                    Effect::StopCapture,
                    Effect::RenderUserMessage(text.clone()),
                    Effect::SendMessage(text),
                    Effect::Emit(InteractionKind::VoiceInput),
                ]
            }

            E::CaptureEnded => {
                if self.state == S::Listening {
                    self.state = S::OpenIdle;
                }
                Vec::new()
            }

            E::CancelPressed => {
                if self.state != S::Listening {
                    return Vec::new();
                }
                self.state = S::OpenIdle;
                vec![Effect::StopCapture]
            }

            E::CaptureFailed(error) => {
                if self.state != S::Listening {
                    return Vec::new();
                }
                self.state = S::Error;
                vec![
                    Effect::StopCapture,
                    Effect::RenderSystemMessage(capture_message(&error)),
                ]
            }

            E::TypedMessage(text) => {
                let text = text.trim().to_string();
                if text.is_empty() {
                    return Vec::new();
                }
                match self.state {
                    S::OpenIdle | S::Speaking => {
                        self.state = S::Processing;
                        vec![
                            Effect::CancelSpeech,
                            Effect::RenderUserMessage(text.clone()),
                            Effect::SendMessage(text),
                            Effect::Emit(InteractionKind::TextInput),
                        ]
                    }
                    S::Listening => {
                        self.state = S::Processing;
                        vec![
                            Effect::StopCapture,
                            Effect::RenderUserMessage(text.clone()),
                            Effect::SendMessage(text),
                            Effect::Emit(InteractionKind::TextInput),
                        ]
                    }
                    S::Processing => {
                        // One request in flight at a time; queue the rest.
                        self.pending.push_back(text.clone());
                        vec![
                            Effect::RenderUserMessage(text),
                            Effect::Emit(InteractionKind::TextInput),
                        ]
                    }
                    S::Closed | S::Error => Vec::new(),
                }
            }

            E::ReplyReceived(text) => {
                if self.state != S::Processing {
                    return Vec::new();
                }
                let mut effects = vec![
                    Effect::RenderAssistantMessage(text.clone()),
                    Effect::Emit(InteractionKind::AiResponse),
                ];
                if let Some(next) = self.pending.pop_front() {
                    // Queued input takes precedence over speaking the reply.
                    effects.push(Effect::SendMessage(next));
                } else if self.config.voice_enabled && self.caps.synthesis {
                    self.state = S::Speaking;
                    effects.push(Effect::Speak(text));
                } else {
                    self.state = S::OpenIdle;
                }
                effects
            }

            E::ReplyFailed(error) => {
                if self.state != S::Processing {
                    return Vec::new();
                }
                self.pending.clear();
                self.state = S::Error;
                vec![Effect::RenderSystemMessage(request_message(&error))]
            }

            E::SynthesisStarted => {
                let mut effects = Vec::new();
                if self.greeting_in_flight {
                    self.greeting_in_flight = false;
                    self.has_greeted = true;
                    self.gesture.disarm();
                    effects.push(Effect::DisarmGestures);
                    effects.push(Effect::Emit(InteractionKind::Greeting));
                }
                effects
            }

            E::SynthesisBlocked => {
                self.greeting_in_flight = false;
                if self.state == S::Speaking {
                    self.state = S::OpenIdle;
                }
                if !self.has_greeted {
                    self.gesture.arm();
                    vec![Effect::ArmGestureRetry]
                } else {
                    Vec::new()
                }
            }

            E::SynthesisFinished | E::StopPressed => {
                self.greeting_in_flight = false;
                if self.state == S::Speaking {
                    self.state = S::OpenIdle;
                    if event == E::StopPressed {
                        return vec![Effect::CancelSpeech];
                    }
                }
                Vec::new()
            }

            E::SynthesisFailed => {
                // Voice is an enhancement: degrade to text-only, no error shown.
                self.greeting_in_flight = false;
                if self.state == S::Speaking {
                    self.state = S::OpenIdle;
                }
                Vec::new()
            }

            E::ErrorCleared => {
                if self.state == S::Error {
                    self.state = S::OpenIdle;
                }
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitevoice_types::error::{CaptureError, RequestError};

    fn orchestrator(caps: SpeechCapabilities) -> DialogueOrchestrator {
        DialogueOrchestrator::new(WidgetConfig::default_for_site("site-1"), caps)
    }

    fn text_only_config() -> WidgetConfig {
        let mut cfg = WidgetConfig::default_for_site("site-1");
        cfg.voice_enabled = false;
        cfg
    }

    #[test]
    fn test_open_schedules_greeting_once() {
        let mut orch = orchestrator(SpeechCapabilities::full());
        let effects = orch.handle(DialogueEvent::ToggleOpen);
        assert!(effects.contains(&Effect::ScheduleGreeting(GREETING_DELAY)));
        assert_eq!(orch.state(), DialogueState::OpenIdle);

        // Greeting fires, is rendered and spoken.
        let effects = orch.handle(DialogueEvent::GreetingDue);
        assert!(effects
            .iter()
            .any(|e| matches!(e, Effect::RenderAssistantMessage(_))));
        assert!(effects.iter().any(|e| matches!(e, Effect::Speak(_))));
        assert_eq!(orch.state(), DialogueState::Speaking);
    }

    #[test]
    fn test_greeting_idempotent_across_reopens() {
        // Any number of Open-Idle re-entries, at most one greeting.
        let mut orch = orchestrator(SpeechCapabilities::full());
        orch.handle(DialogueEvent::ToggleOpen);
        orch.handle(DialogueEvent::GreetingDue);
        orch.handle(DialogueEvent::SynthesisFinished);

        for _ in 0..3 {
            orch.handle(DialogueEvent::ToggleClose);
            let open_effects = orch.handle(DialogueEvent::ToggleOpen);
            assert!(
                !open_effects
                    .iter()
                    .any(|e| matches!(e, Effect::ScheduleGreeting(_))),
                "greeting must not be rescheduled after delivery"
            );
            assert!(orch.handle(DialogueEvent::GreetingDue).is_empty());
        }
        assert!(orch.has_greeted());
    }

    #[test]
    fn test_mic_press_cancels_synthesis_first() {
        // Entering Listening always cancels synthesis before capture.
        let mut orch = orchestrator(SpeechCapabilities::full());
        orch.handle(DialogueEvent::ToggleOpen);
        orch.handle(DialogueEvent::GreetingDue);
        assert_eq!(orch.state(), DialogueState::Speaking);

        let effects = orch.handle(DialogueEvent::MicPressed);
        let cancel_pos = effects.iter().position(|e| *e == Effect::CancelSpeech);
        let start_pos = effects.iter().position(|e| *e == Effect::StartCapture);
        assert!(cancel_pos.unwrap() < start_pos.unwrap());
        assert_eq!(orch.state(), DialogueState::Listening);
    }

    #[test]
    fn test_no_speak_effect_while_listening() {
        // Other direction: no transition out of Listening emits Speak.
        let mut orch = orchestrator(SpeechCapabilities::full());
        orch.handle(DialogueEvent::ToggleOpen);
        orch.handle(DialogueEvent::MicPressed);
        assert_eq!(orch.state(), DialogueState::Listening);

        for event in [
            DialogueEvent::GreetingDue,
            DialogueEvent::ReplyReceived("late".to_string()),
            DialogueEvent::SynthesisFinished,
        ] {
            let effects = orch.handle(event);
            assert!(
                !effects.iter().any(|e| matches!(e, Effect::Speak(_))),
                "Speak emitted while Listening"
            );
        }
    }

    #[test]
    fn test_voice_roundtrip() {
        let mut orch = orchestrator(SpeechCapabilities::full());
        orch.handle(DialogueEvent::ToggleOpen);
        orch.handle(DialogueEvent::GreetingDue);
        orch.handle(DialogueEvent::SynthesisFinished);

        orch.handle(DialogueEvent::MicPressed);
        let effects = orch.handle(DialogueEvent::TranscriptFinal("where is pricing?".to_string()));
        assert_eq!(orch.state(), DialogueState::Processing);
        assert!(effects.contains(&Effect::SendMessage("where is pricing?".to_string())));
        assert!(effects.contains(&Effect::Emit(
            sitevoice_types::interaction::InteractionKind::VoiceInput
        )));

        let effects = orch.handle(DialogueEvent::ReplyReceived("On the pricing page.".to_string()));
        assert_eq!(orch.state(), DialogueState::Speaking);
        assert!(effects.contains(&Effect::Speak("On the pricing page.".to_string())));

        orch.handle(DialogueEvent::SynthesisFinished);
        assert_eq!(orch.state(), DialogueState::OpenIdle);
    }

    #[test]
    fn test_permission_denied_surfaces_and_recovers() {
        // Listening -> Error -> Open-Idle with the settings hint.
        let mut orch = orchestrator(SpeechCapabilities::full());
        orch.handle(DialogueEvent::ToggleOpen);
        orch.handle(DialogueEvent::MicPressed);

        let effects = orch.handle(DialogueEvent::CaptureFailed(CaptureError::PermissionDenied));
        assert_eq!(orch.state(), DialogueState::Error);
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::RenderSystemMessage(msg) if msg.contains("Microphone access denied")
        )));

        orch.handle(DialogueEvent::ErrorCleared);
        assert_eq!(orch.state(), DialogueState::OpenIdle);
    }

    #[test]
    fn test_capture_end_without_result_returns_to_idle() {
        let mut orch = orchestrator(SpeechCapabilities::full());
        orch.handle(DialogueEvent::ToggleOpen);
        orch.handle(DialogueEvent::MicPressed);
        orch.handle(DialogueEvent::CaptureEnded);
        assert_eq!(orch.state(), DialogueState::OpenIdle);
    }

    #[test]
    fn test_text_only_degradation() {
        // With synthesis unavailable, replies still render, no error.
        let mut orch = DialogueOrchestrator::new(
            WidgetConfig::default_for_site("site-1"),
            SpeechCapabilities::none(),
        );
        orch.handle(DialogueEvent::ToggleOpen);
        orch.handle(DialogueEvent::GreetingDue);
        // Greeting rendered but not spoken; state stays OpenIdle.
        assert_eq!(orch.state(), DialogueState::OpenIdle);

        orch.handle(DialogueEvent::TypedMessage("hello".to_string()));
        let effects = orch.handle(DialogueEvent::ReplyReceived("hi!".to_string()));
        assert!(effects.contains(&Effect::RenderAssistantMessage("hi!".to_string())));
        assert!(!effects.iter().any(|e| matches!(e, Effect::Speak(_))));
        assert!(!effects
            .iter()
            .any(|e| matches!(e, Effect::RenderSystemMessage(_))));
        assert_eq!(orch.state(), DialogueState::OpenIdle);
    }

    #[test]
    fn test_voice_disabled_config_never_speaks() {
        let mut orch =
            DialogueOrchestrator::new(text_only_config(), SpeechCapabilities::full());
        orch.handle(DialogueEvent::ToggleOpen);
        let effects = orch.handle(DialogueEvent::GreetingDue);
        assert!(!effects.iter().any(|e| matches!(e, Effect::Speak(_))));
        assert_eq!(orch.state(), DialogueState::OpenIdle);
    }

    #[test]
    fn test_typed_while_processing_is_queued() {
        let mut orch = orchestrator(SpeechCapabilities::full());
        orch.handle(DialogueEvent::ToggleOpen);
        orch.handle(DialogueEvent::GreetingDue);
        orch.handle(DialogueEvent::SynthesisFinished);
        orch.handle(DialogueEvent::TypedMessage("first".to_string()));
        assert_eq!(orch.state(), DialogueState::Processing);

        // Second message while in flight: rendered, not sent.
        let effects = orch.handle(DialogueEvent::TypedMessage("second".to_string()));
        assert!(!effects.iter().any(|e| matches!(e, Effect::SendMessage(_))));

        // Reply to the first releases the queued second, still Processing.
        let effects = orch.handle(DialogueEvent::ReplyReceived("reply one".to_string()));
        assert!(effects.contains(&Effect::SendMessage("second".to_string())));
        assert_eq!(orch.state(), DialogueState::Processing);

        // Reply to the second finally speaks.
        let effects = orch.handle(DialogueEvent::ReplyReceived("reply two".to_string()));
        assert!(effects.contains(&Effect::Speak("reply two".to_string())));
    }

    #[test]
    fn test_reply_failure_clears_queue_and_recovers() {
        let mut orch = orchestrator(SpeechCapabilities::full());
        orch.handle(DialogueEvent::ToggleOpen);
        orch.handle(DialogueEvent::TypedMessage("first".to_string()));
        orch.handle(DialogueEvent::TypedMessage("second".to_string()));

        let effects = orch.handle(DialogueEvent::ReplyFailed(RequestError::Timeout));
        assert_eq!(orch.state(), DialogueState::Error);
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::RenderSystemMessage(msg) if msg.contains("check your connection")
        )));

        orch.handle(DialogueEvent::ErrorCleared);
        // Queue was dropped: a reply arriving now is ignored.
        assert!(orch.handle(DialogueEvent::ReplyReceived("stale".to_string())).is_empty());
    }

    #[test]
    fn test_close_cancels_audio_both_ways() {
        let mut orch = orchestrator(SpeechCapabilities::full());
        orch.handle(DialogueEvent::ToggleOpen);
        orch.handle(DialogueEvent::GreetingDue);
        assert_eq!(orch.state(), DialogueState::Speaking);

        let effects = orch.handle(DialogueEvent::ToggleClose);
        assert!(effects.contains(&Effect::CancelSpeech));
        assert!(effects.contains(&Effect::StopCapture));
        assert_eq!(orch.state(), DialogueState::Closed);
    }

    #[test]
    fn test_autoplay_blocked_greeting_retries_once_on_gesture() {
        let mut orch = orchestrator(SpeechCapabilities::full());

        // Page load attempts the spoken greeting.
        let effects = orch.handle(DialogueEvent::PageLoaded);
        assert!(effects.iter().any(|e| matches!(e, Effect::Speak(_))));

        // Autoplay policy refuses; the gesture hook arms.
        let effects = orch.handle(DialogueEvent::SynthesisBlocked);
        assert!(effects.contains(&Effect::ArmGestureRetry));

        // First gesture retries exactly once and unsubscribes.
        let effects = orch.handle(DialogueEvent::GestureFired);
        assert!(effects.iter().any(|e| matches!(e, Effect::Speak(_))));
        assert!(effects.contains(&Effect::DisarmGestures));

        // This time the synthesizer starts; the greeting is delivered.
        orch.handle(DialogueEvent::SynthesisStarted);
        assert!(orch.has_greeted());

        // Later gestures never speak again.
        let effects = orch.handle(DialogueEvent::GestureFired);
        assert!(!effects.iter().any(|e| matches!(e, Effect::Speak(_))));
    }

    #[test]
    fn test_blocked_greeting_not_rearmed_after_delivery() {
        let mut orch = orchestrator(SpeechCapabilities::full());
        orch.handle(DialogueEvent::PageLoaded);
        orch.handle(DialogueEvent::SynthesisBlocked);

        // The user opens the widget before gesturing; the scheduled
        // greeting delivers through the panel instead.
        orch.handle(DialogueEvent::ToggleOpen);
        orch.handle(DialogueEvent::GreetingDue);
        assert!(orch.has_greeted());

        // The armed gesture now fires but must not re-speak the greeting.
        let effects = orch.handle(DialogueEvent::GestureFired);
        assert!(!effects.iter().any(|e| matches!(e, Effect::Speak(_))));
    }

    #[test]
    fn test_page_load_greeting_skipped_without_voice() {
        let mut orch =
            DialogueOrchestrator::new(text_only_config(), SpeechCapabilities::full());
        assert!(orch.handle(DialogueEvent::PageLoaded).is_empty());
    }

    #[test]
    fn test_mic_ignored_without_recognition() {
        let mut orch = DialogueOrchestrator::new(
            WidgetConfig::default_for_site("site-1"),
            SpeechCapabilities { recognition: false, synthesis: true },
        );
        orch.handle(DialogueEvent::ToggleOpen);
        assert!(orch.handle(DialogueEvent::MicPressed).is_empty());
        assert_eq!(orch.state(), DialogueState::OpenIdle);
    }

    #[test]
    fn test_empty_transcript_returns_to_idle() {
        let mut orch = orchestrator(SpeechCapabilities::full());
        orch.handle(DialogueEvent::ToggleOpen);
        orch.handle(DialogueEvent::MicPressed);
        let effects = orch.handle(DialogueEvent::TranscriptFinal("   ".to_string()));
        assert_eq!(orch.state(), DialogueState::OpenIdle);
        assert!(!effects.iter().any(|e| matches!(e, Effect::SendMessage(_))));
    }

    #[test]
    fn test_stop_pressed_cancels_playback() {
        let mut orch = orchestrator(SpeechCapabilities::full());
        orch.handle(DialogueEvent::ToggleOpen);
        orch.handle(DialogueEvent::GreetingDue);
        let effects = orch.handle(DialogueEvent::StopPressed);
        assert!(effects.contains(&Effect::CancelSpeech));
        assert_eq!(orch.state(), DialogueState::OpenIdle);
    }

    #[test]
    fn test_destroy_releases_everything() {
        let mut orch = orchestrator(SpeechCapabilities::full());
        orch.handle(DialogueEvent::ToggleOpen);
        orch.handle(DialogueEvent::TypedMessage("pending".to_string()));

        let effects = orch.destroy();
        assert!(effects.contains(&Effect::CancelSpeech));
        assert!(effects.contains(&Effect::StopCapture));
        assert!(effects.contains(&Effect::DisarmGestures));
        assert_eq!(orch.state(), DialogueState::Closed);
    }

    #[test]
    fn test_synthesis_failure_is_silent() {
        let mut orch = orchestrator(SpeechCapabilities::full());
        orch.handle(DialogueEvent::ToggleOpen);
        orch.handle(DialogueEvent::GreetingDue);
        let effects = orch.handle(DialogueEvent::SynthesisFailed);
        assert!(effects.is_empty());
        assert_eq!(orch.state(), DialogueState::OpenIdle);
    }
}
