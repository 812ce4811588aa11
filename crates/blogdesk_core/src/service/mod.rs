//! Use-case layer for the editor.
//!
//! # Responsibility
//! - Expose session-level APIs that coordinate model, store, preview and
//!   sync.
//! - Keep the autosave schedule testable without wall-clock waits.

pub mod autosave;
pub mod session;
