//! Core abstractions for Ticklist: the task model, the single-slot storage
//! contract, and the in-memory store that owns all task state.
//! This crate is intentionally small to keep dependency surface minimal.

pub mod storage;
pub mod store;
pub mod tasks;
