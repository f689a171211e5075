//! Application layer for the Property Assistant client.
//!
//! Wires the interaction layer into a chat thread that owns the
//! conversation and enforces one in-flight turn at a time.

pub mod assistant;
pub mod chat_thread;

pub use assistant::PropertyAssistant;
pub use chat_thread::{ChatThread, ThreadEntry, ThreadError, TurnOutcome};
