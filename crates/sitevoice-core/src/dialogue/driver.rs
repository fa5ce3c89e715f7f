//! Effect execution for the dialogue orchestrator.
//!
//! The driver owns the orchestrator plus the injected capability
//! implementations and runs each returned [`Effect`] in order. Follow-up
//! events produced while executing (reply arrived, capture failed,
//! synthesis blocked) go through an internal queue, so a single call to
//! [`DialogueDriver::dispatch`] settles the whole cascade.

use std::collections::VecDeque;
use std::time::Duration;

use tracing::debug;

use sitevoice_types::error::{RequestError, SynthesisError};
use sitevoice_types::interaction::InteractionEvent;
use sitevoice_types::widget::{DialogueState, WidgetConfig};

use crate::event::sink::InteractionSink;

use super::capability::{SpeechCapabilities, SpeechCapture, SpeechOutput};
use super::identity::{resolve_visitor_id, VisitorIdentityStore};
use super::orchestrator::DialogueOrchestrator;
use super::state::{DialogueEvent, Effect};

/// Hard ceiling on a single conversational request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(12);

/// Outgoing conversational request.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub site_id: String,
    pub message: String,
    pub session_id: Option<String>,
    pub visitor_id: Option<String>,
}

/// Server reply to a conversational request.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub response: String,
    pub session_id: String,
    pub visitor_id: String,
}

/// Transport to the conversation endpoint.
pub trait ConversationClient: Send + Sync {
    fn send(
        &self,
        request: &ChatRequest,
    ) -> impl std::future::Future<Output = Result<ChatReply, RequestError>> + Send;
}

/// Who produced a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
    System,
}

/// One rendered line of the conversation panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
}

/// Runs orchestrator effects against the injected capabilities.
pub struct DialogueDriver<C, O, K, S> {
    orchestrator: DialogueOrchestrator,
    capture: C,
    output: O,
    client: K,
    sink: S,
    site_id: String,
    session_id: Option<String>,
    visitor_id: String,
    transcript: Vec<TranscriptEntry>,
    /// Embedder-visible flag: gesture listeners should be attached.
    gesture_armed: bool,
}

impl<C, O, K, S> DialogueDriver<C, O, K, S>
where
    C: SpeechCapture,
    O: SpeechOutput,
    K: ConversationClient,
    S: InteractionSink,
{
    pub fn new<I: VisitorIdentityStore>(
        config: WidgetConfig,
        caps: SpeechCapabilities,
        capture: C,
        output: O,
        client: K,
        sink: S,
        identity: &I,
    ) -> Self {
        let site_id = config.site_id.clone();
        let visitor_id = resolve_visitor_id(identity);
        Self {
            orchestrator: DialogueOrchestrator::new(config, caps),
            capture,
            output,
            client,
            sink,
            site_id,
            session_id: None,
            visitor_id,
            transcript: Vec::new(),
            gesture_armed: false,
        }
    }

    pub fn state(&self) -> DialogueState {
        self.orchestrator.state()
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn visitor_id(&self) -> &str {
        &self.visitor_id
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Gesture listeners should currently be bound on the host page.
    pub fn gesture_armed(&self) -> bool {
        self.gesture_armed
    }

    /// Feed an event and settle every resulting effect and follow-up event.
    pub async fn dispatch(&mut self, event: DialogueEvent) {
        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            let effects = self.orchestrator.handle(event);
            for effect in effects {
                self.execute(effect, &mut queue).await;
            }
            // The error state is purely presentational here: the message is
            // already in the transcript, so settle back to idle.
            if self.orchestrator.state() == DialogueState::Error {
                queue.push_back(DialogueEvent::ErrorCleared);
            }
        }
    }

    /// Tear down: cancel audio both ways and drop gesture listeners.
    pub fn destroy(&mut self) {
        for effect in self.orchestrator.destroy() {
            match effect {
                Effect::CancelSpeech => self.output.cancel(),
                Effect::StopCapture => self.capture.stop(),
                Effect::DisarmGestures => self.gesture_armed = false,
                _ => {}
            }
        }
    }

    async fn execute(&mut self, effect: Effect, queue: &mut VecDeque<DialogueEvent>) {
        match effect {
            Effect::StartCapture => {
                if let Err(error) = self.capture.start().await {
                    queue.push_back(DialogueEvent::CaptureFailed(error));
                }
            }
            Effect::StopCapture => self.capture.stop(),
            Effect::Speak(text) => {
                let language = self.orchestrator.config().language.clone();
                match self.output.speak(&text, &language) {
                    Ok(()) => queue.push_back(DialogueEvent::SynthesisStarted),
                    Err(SynthesisError::Blocked) => {
                        queue.push_back(DialogueEvent::SynthesisBlocked)
                    }
                    Err(error) => {
                        debug!(%error, "synthesis refused, continuing text-only");
                        queue.push_back(DialogueEvent::SynthesisFailed);
                    }
                }
            }
            Effect::CancelSpeech => self.output.cancel(),
            Effect::SendMessage(text) => {
                let request = ChatRequest {
                    site_id: self.site_id.clone(),
                    message: text,
                    session_id: self.session_id.clone(),
                    visitor_id: Some(self.visitor_id.clone()),
                };
                let outcome =
                    tokio::time::timeout(REQUEST_TIMEOUT, self.client.send(&request)).await;
                match outcome {
                    Ok(Ok(reply)) => {
                        self.session_id = Some(reply.session_id);
                        self.visitor_id = reply.visitor_id;
                        queue.push_back(DialogueEvent::ReplyReceived(reply.response));
                    }
                    Ok(Err(error)) => queue.push_back(DialogueEvent::ReplyFailed(error)),
                    Err(_) => queue.push_back(DialogueEvent::ReplyFailed(RequestError::Timeout)),
                }
            }
            Effect::RenderUserMessage(text) => {
                self.transcript.push(TranscriptEntry { speaker: Speaker::User, text });
            }
            Effect::RenderAssistantMessage(text) => {
                self.transcript.push(TranscriptEntry { speaker: Speaker::Assistant, text });
            }
            Effect::RenderSystemMessage(text) => {
                self.transcript.push(TranscriptEntry { speaker: Speaker::System, text });
            }
            Effect::ScheduleGreeting(delay) => {
                tokio::time::sleep(delay).await;
                queue.push_back(DialogueEvent::GreetingDue);
            }
            Effect::ArmGestureRetry => self.gesture_armed = true,
            Effect::DisarmGestures => self.gesture_armed = false,
            Effect::Emit(kind) => {
                self.sink
                    .record(InteractionEvent::new(
                        self.site_id.clone(),
                        self.session_id.clone().unwrap_or_default(),
                        kind,
                    ))
                    .await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use sitevoice_types::error::CaptureError;
    use sitevoice_types::interaction::InteractionKind;

    use crate::dialogue::identity::InMemoryIdentityStore;
    use crate::event::sink::NullSink;

    #[derive(Default)]
    struct CaptureState {
        deny: bool,
        started: u32,
        stopped: u32,
    }

    #[derive(Clone, Default)]
    struct FakeCapture(Arc<Mutex<CaptureState>>);

    impl FakeCapture {
        fn denying() -> Self {
            Self(Arc::new(Mutex::new(CaptureState { deny: true, ..Default::default() })))
        }

        fn stopped(&self) -> u32 {
            self.0.lock().unwrap().stopped
        }
    }

    impl SpeechCapture for FakeCapture {
        async fn start(&mut self) -> Result<(), CaptureError> {
            let mut state = self.0.lock().unwrap();
            if state.deny {
                return Err(CaptureError::PermissionDenied);
            }
            state.started += 1;
            Ok(())
        }

        fn stop(&mut self) {
            self.0.lock().unwrap().stopped += 1;
        }
    }

    #[derive(Default)]
    struct OutputState {
        block_next: bool,
        spoken: Vec<String>,
        cancelled: u32,
    }

    #[derive(Clone, Default)]
    struct FakeOutput(Arc<Mutex<OutputState>>);

    impl FakeOutput {
        fn blocking_first() -> Self {
            Self(Arc::new(Mutex::new(OutputState { block_next: true, ..Default::default() })))
        }

        fn spoken(&self) -> Vec<String> {
            self.0.lock().unwrap().spoken.clone()
        }

        fn cancelled(&self) -> u32 {
            self.0.lock().unwrap().cancelled
        }
    }

    impl SpeechOutput for FakeOutput {
        fn speak(&mut self, text: &str, _language: &str) -> Result<(), SynthesisError> {
            let mut state = self.0.lock().unwrap();
            if state.block_next {
                state.block_next = false;
                return Err(SynthesisError::Blocked);
            }
            state.spoken.push(text.to_string());
            Ok(())
        }

        fn cancel(&mut self) {
            self.0.lock().unwrap().cancelled += 1;
        }
    }

    #[derive(Clone)]
    struct FakeClient {
        reply: Result<String, RequestError>,
        seen: Arc<Mutex<Vec<ChatRequest>>>,
    }

    impl FakeClient {
        fn replying(text: &str) -> Self {
            Self { reply: Ok(text.to_string()), seen: Arc::new(Mutex::new(Vec::new())) }
        }

        fn failing(error: RequestError) -> Self {
            Self { reply: Err(error), seen: Arc::new(Mutex::new(Vec::new())) }
        }
    }

    impl ConversationClient for FakeClient {
        async fn send(&self, request: &ChatRequest) -> Result<ChatReply, RequestError> {
            self.seen.lock().unwrap().push(request.clone());
            self.reply.clone().map(|response| ChatReply {
                response,
                session_id: "sess-1".to_string(),
                visitor_id: request
                    .visitor_id
                    .clone()
                    .unwrap_or_else(|| "visitor-minted".to_string()),
            })
        }
    }

    fn driver(
        capture: FakeCapture,
        output: FakeOutput,
        client: FakeClient,
    ) -> DialogueDriver<FakeCapture, FakeOutput, FakeClient, NullSink> {
        let identity = InMemoryIdentityStore::with_id("visitor-test");
        DialogueDriver::new(
            WidgetConfig::default_for_site("site-1"),
            SpeechCapabilities::full(),
            capture,
            output,
            client,
            NullSink,
            &identity,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_typed_message_roundtrip_updates_session() {
        let client = FakeClient::replying("Happy to help!");
        let mut driver = driver(FakeCapture::default(), FakeOutput::default(), client.clone());

        driver.dispatch(DialogueEvent::ToggleOpen).await;
        driver.dispatch(DialogueEvent::TypedMessage("hi".to_string())).await;

        assert_eq!(driver.session_id(), Some("sess-1"));
        let sent = client.seen.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].visitor_id.as_deref(), Some("visitor-test"));
        drop(sent);

        // Greeting + user line + assistant line in order.
        let lines: Vec<_> = driver.transcript().iter().map(|e| e.speaker).collect();
        assert_eq!(lines, vec![Speaker::Assistant, Speaker::User, Speaker::Assistant]);
        assert_eq!(driver.transcript().last().unwrap().text, "Happy to help!");
    }

    #[tokio::test(start_paused = true)]
    async fn test_permission_denied_renders_and_settles_idle() {
        let mut driver =
            driver(FakeCapture::denying(), FakeOutput::default(), FakeClient::replying("ok"));

        driver.dispatch(DialogueEvent::ToggleOpen).await;
        driver.dispatch(DialogueEvent::MicPressed).await;

        // Error was surfaced and then cleared back to idle in one dispatch.
        assert_eq!(driver.state(), DialogueState::OpenIdle);
        let last = driver.transcript().last().unwrap();
        assert_eq!(last.speaker, Speaker::System);
        assert!(last.text.contains("Microphone access denied"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_failure_settles_idle_with_message() {
        let mut driver = driver(
            FakeCapture::default(),
            FakeOutput::default(),
            FakeClient::failing(RequestError::Network),
        );

        driver.dispatch(DialogueEvent::ToggleOpen).await;
        driver.dispatch(DialogueEvent::TypedMessage("hello".to_string())).await;

        assert_eq!(driver.state(), DialogueState::OpenIdle);
        let last = driver.transcript().last().unwrap();
        assert_eq!(last.speaker, Speaker::System);
        assert!(last.text.contains("check your connection"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_blocked_greeting_arms_gesture_then_speaks_once() {
        let output = FakeOutput::blocking_first();
        let mut driver =
            driver(FakeCapture::default(), output.clone(), FakeClient::replying("ok"));

        driver.dispatch(DialogueEvent::PageLoaded).await;
        assert!(driver.gesture_armed());
        assert!(output.spoken().is_empty());

        driver.dispatch(DialogueEvent::GestureFired).await;
        assert!(!driver.gesture_armed());
        assert_eq!(output.spoken().len(), 1);

        // Further gestures are inert.
        driver.dispatch(DialogueEvent::GestureFired).await;
        assert_eq!(output.spoken().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduled_greeting_delivers_after_delay() {
        let mut driver =
            driver(FakeCapture::default(), FakeOutput::default(), FakeClient::replying("ok"));

        driver.dispatch(DialogueEvent::ToggleOpen).await;
        // With paused time the sleep inside dispatch auto-advances.
        assert_eq!(driver.transcript().len(), 1);
        assert_eq!(driver.transcript()[0].speaker, Speaker::Assistant);
        assert_eq!(driver.state(), DialogueState::Speaking);
    }

    #[tokio::test(start_paused = true)]
    async fn test_destroy_cancels_audio() {
        let capture = FakeCapture::default();
        let output = FakeOutput::default();
        let mut driver =
            driver(capture.clone(), output.clone(), FakeClient::replying("ok"));

        driver.dispatch(DialogueEvent::ToggleOpen).await;
        driver.destroy();
        assert_eq!(driver.state(), DialogueState::Closed);
        assert!(output.cancelled() >= 1);
        assert!(capture.stopped() >= 1);
    }
}
