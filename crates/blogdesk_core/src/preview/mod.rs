//! Preview rendering.
//!
//! # Responsibility
//! - Map read-only translation snapshots to static HTML for a preview pane.

pub mod html;
