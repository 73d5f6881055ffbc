//! State recovery after failure: event-sourced replay, checkpoint
//! selection, and circuit breaking.

pub mod breaker;
pub mod replay;
