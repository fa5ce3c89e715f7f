//! Best-effort interaction event sink.

pub mod sink;

pub use sink::{InteractionSink, NullSink};
