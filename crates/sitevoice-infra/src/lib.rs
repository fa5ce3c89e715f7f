//! Infrastructure implementations for Sitevoice.
//!
//! SQLite repositories behind the core repository traits, the Groq
//! completion provider, and the configuration loader. Nothing in here
//! defines behavior; it adapts storage and HTTP to the traits in
//! `sitevoice-core`.

pub mod config;
pub mod llm;
pub mod sqlite;
