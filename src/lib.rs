//! Selection, focus and anchor tracking for keyboard-driven list, table and
//! tree views.
//!
//! [`SelectionEngine`] owns an [`ObservableList`] of items together with its
//! selection state and turns classified key [`Command`]s into changes,
//! notifying subscribed listeners once per batch. Rendering is left to the
//! caller.

pub mod adapter;
pub mod engine;
pub mod error;
pub mod keymap;
pub mod model;
pub mod msg;
pub mod notify;

pub use engine::{EngineOptions, Outcome, SelectionEngine, SelectionView, TreeRow};
pub use error::{Result, SelectionError};
pub use model::columns::{Column, ColumnSet};
pub use model::focus::FocusChange;
pub use model::items::{ListChange, ObservableList};
pub use model::mode::{Granularity, SelectionMode};
pub use model::position::{ColumnId, Position};
pub use model::selection::{SelectionChange, SelectionModel, SelectionStore};
pub use msg::{Command, Modifiers, Step};
pub use notify::Subscription;
