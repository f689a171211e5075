//! Backend interaction for the Property Assistant client.
//!
//! - `backend`: the `ChatBackend` transport seam and its reqwest implementation
//! - `adapter`: `ChatModelAdapter`, one backend exchange per user turn
//! - `supported_models`: per-stage model catalogue

pub mod adapter;
pub mod backend;
pub mod supported_models;

pub use adapter::{ChatModelAdapter, PropertyChatAdapter};
pub use backend::{ChatBackend, HttpChatBackend, message_endpoint};
