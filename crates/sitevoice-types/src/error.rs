use thiserror::Error;

/// Errors from the memory engine's `respond` path.
///
/// Only `InvalidInput` ever reaches the API caller; provider failures are
/// absorbed by the fallback responder and storage failures degrade to a
/// context-free conversation.
#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from repository operations (used by trait definitions in sitevoice-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}

/// Failures of the speech capture subsystem, mapped to user-facing
/// system messages by the dialogue orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("microphone permission denied")]
    PermissionDenied,

    #[error("no speech detected")]
    NoSpeech,

    #[error("capture aborted")]
    Aborted,

    #[error("network failure during capture")]
    Network,

    #[error("speech recognition unavailable")]
    Unavailable,
}

/// Failures of the speech synthesis subsystem.
///
/// Synthesis is an enhancement, not a requirement: every variant degrades
/// the dialogue to text-only without surfacing an error to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    #[error("speech synthesis unavailable")]
    Unavailable,

    /// Playback silently refused, typically an autoplay restriction before
    /// the first user gesture on the host page.
    #[error("playback blocked by autoplay policy")]
    Blocked,

    #[error("synthesis interrupted")]
    Interrupted,

    #[error("synthesis failed: {0}")]
    Failed(String),
}

/// Failure modes of a conversation request seen by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("request timed out")]
    Timeout,

    #[error("network failure")]
    Network,

    #[error("server error: {0}")]
    Server(String),
}
