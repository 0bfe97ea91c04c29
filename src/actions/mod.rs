//! The undoable command layer.
//!
//! An edit is an action value built by [`ModelActionFactory`], applied by
//! a processor through [`ModelActionExecutor`] and recorded in
//! [`ModelActionHistory`] for undo, redo and saving.

pub mod executor;
pub mod factory;
pub mod history;
pub mod processors;
pub mod types;

pub use executor::ModelActionExecutor;
pub use factory::{ActionFactory, ModelActionFactory};
pub use history::{HistoryEntry, ModelActionHistory};
pub use processors::ActionProcessor;
pub use types::*;
