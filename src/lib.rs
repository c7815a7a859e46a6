//! Storyreel - story-viewer media components for terminal UIs.
//!
//! This crate provides the media plumbing behind a story viewer: a
//! cost-bounded in-memory image cache, an async fetch session with
//! best-effort cancellation, and tri-state (loading/loaded/failed) story
//! views with a retry affordance, rendered as ratatui widgets.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;
/// Presentation layer containing view state and widgets.
pub mod presentation;

/// Current version of the library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = "storyreel";
