//! Shared domain types for sitevoice.
//!
//! This crate contains the core domain types used across the sitevoice
//! workspace: conversation turns, widget configuration, dialogue states,
//! LLM request/response shapes, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod interaction;
pub mod llm;
pub mod turn;
pub mod widget;
