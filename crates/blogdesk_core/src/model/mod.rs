//! Document model for multilingual blog posts.
//!
//! # Responsibility
//! - Define the canonical Project -> Translation -> Section tree.
//! - Provide CRUD operations, validation and editor draft conversion.
//!
//! # Invariants
//! - Ownership is strictly hierarchical: no sharing, no cycles.
//! - Model operations are pure in-memory mutations; persistence and sync
//!   live in `repo` and `sync`.

pub mod collection;
pub mod content;
pub mod draft;
pub mod error;
pub mod project;
pub mod section;
pub mod summary;
pub mod translation;
pub mod validation;
