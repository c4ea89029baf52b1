//! State Management Module
//!
//! Provides the on-disk project graph and undo/redo history.

pub mod project;
pub mod undo;

pub use project::{Project, ProjectGraph};
pub use undo::{NameSnapshot, UndoAction, UndoManager};
