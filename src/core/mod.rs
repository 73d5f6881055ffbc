//! Foundational types shared across the engine.

pub mod account;
pub mod entry;
pub mod event;
