//! Durable slot storage for Ticklist.
//! One plain-text file per slot, written atomically via a temp-file rename.

pub mod file_slot;
