//! Action processors: apply an action to the store, undo it, and describe
//! it as a changeset.
//!
//! `restore` is the exact inverse of `execute` for the same action value.
//! Everything `restore` needs is either evaluated by the factory or recorded
//! on the action by `execute`; processors never allocate nodes.

pub mod attribute;
pub mod create;
pub mod remove;
pub mod restore;

use crate::changeset::ModelChangeSet;
use crate::error::{ModelError, Result};
use crate::model::{ModelStore, NodeId};

pub use attribute::{
    ModelChangeAttributeActionProcessor, ModelValidateAttributeActionProcessor,
    ModelValidateAttributesActionProcessor,
};
pub use create::{
    ModelCreateControlActionProcessor, ModelCreateControlParamActionProcessor,
    ModelCreateFieldActionProcessor, ModelCreatePropertyActionProcessor,
    ModelCreateRegionActionProcessor,
};
pub use remove::{
    ModelRemoveControlActionProcessor, ModelRemoveFieldActionProcessor,
    ModelRemoveRegionActionProcessor,
};
pub use restore::{
    ModelRestoreInheritedAttributeActionProcessor, ModelRestoreInheritedControlActionProcessor,
    ModelRestoreInheritedFieldActionProcessor, ModelRestoreInheritedRegionActionProcessor,
};

pub trait ActionProcessor {
    type Action;

    /// Mutate the store; returns the affected model.
    fn execute(&self, store: &mut ModelStore, action: &mut Self::Action) -> Result<NodeId>;

    /// Undo `execute`; returns the affected model.
    fn restore(&self, store: &mut ModelStore, action: &mut Self::Action) -> Result<NodeId>;

    /// Persistable diff of an executed action.
    fn changeset(&self, store: &ModelStore, action: &Self::Action) -> Result<Vec<ModelChangeSet>>;
}

pub(crate) fn node_key(store: &ModelStore, id: NodeId) -> Result<String> {
    Ok(store.node(id)?.id.clone())
}

pub(crate) fn not_executed(action: &str) -> ModelError {
    ModelError::InvalidAction(format!("{action} was not executed"))
}
