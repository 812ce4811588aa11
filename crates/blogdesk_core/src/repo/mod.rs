//! Persistence for the project collection.
//!
//! # Responsibility
//! - Define the document store contract and its JSON file implementation.
//! - Adapt legacy document shapes to the canonical schema.
//!
//! # Invariants
//! - Store APIs return `StoreError` and never touch in-memory state; the
//!   session decides how failures surface.

pub mod document_store;
pub mod migrate;
