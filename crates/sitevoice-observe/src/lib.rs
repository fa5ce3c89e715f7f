//! Observability setup for Sitevoice.
//!
//! Structured logging via `tracing` with an optional OpenTelemetry bridge
//! for local span inspection.

pub mod tracing_setup;
