//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools.

pub mod interaction;
pub mod pool;
pub mod turn;
pub mod widget;
