use tracing::debug;

use super::remove::{detach_model, reattach_model, set_field_regions};
use super::{node_key, not_executed, ActionProcessor};
use crate::actions::types::{
    RestoreInheritedAttributeAction, RestoreInheritedControlAction, RestoreInheritedFieldAction,
    RestoreInheritedRegionAction,
};
use crate::changeset::{ModelChangeSet, ModelChangeSetBuilder, ModelOperation};
use crate::error::{ModelError, Result};
use crate::model::{ModelContainer, ModelStore, NodeId};

/// Show `inherited` in place of the owned override.
fn swap_in_inherited(
    store: &mut ModelStore,
    model: NodeId,
    inherited: NodeId,
    context: NodeId,
    slot: ModelContainer,
) -> Result<()> {
    store.replace(context, slot, inherited)?;
    store.set_parent(model, None)?;
    debug!(model = %node_key(store, model)?, slot = %slot, "restored inherited model");
    Ok(())
}

fn swap_back_override(
    store: &mut ModelStore,
    model: NodeId,
    context: NodeId,
    slot: ModelContainer,
) -> Result<()> {
    store.replace(context, slot, model)?;
    store.set_parent(model, Some(context))
}

fn inherited_of(inherited: Option<NodeId>, store: &ModelStore, model: NodeId) -> Result<NodeId> {
    inherited.ok_or_else(|| {
        ModelError::MissingReference(store.get(model).map(|n| n.id.clone()).unwrap_or_default())
    })
}

fn restore_change_set(
    store: &ModelStore,
    context: NodeId,
    model: NodeId,
) -> Result<Vec<ModelChangeSet>> {
    Ok(vec![ModelChangeSetBuilder::build_child_change_set(
        store,
        context,
        model,
        ModelOperation::Restore,
    )?])
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ModelRestoreInheritedFieldActionProcessor;

impl ActionProcessor for ModelRestoreInheritedFieldActionProcessor {
    type Action = RestoreInheritedFieldAction;

    fn execute(&self, store: &mut ModelStore, action: &mut Self::Action) -> Result<NodeId> {
        let inherited = inherited_of(action.inherited, store, action.model)?;
        swap_in_inherited(store, action.model, inherited, action.context, ModelContainer::Fields)?;
        Ok(inherited)
    }

    fn restore(&self, store: &mut ModelStore, action: &mut Self::Action) -> Result<NodeId> {
        swap_back_override(store, action.model, action.context, ModelContainer::Fields)?;
        Ok(action.model)
    }

    fn changeset(&self, store: &ModelStore, action: &Self::Action) -> Result<Vec<ModelChangeSet>> {
        restore_change_set(store, action.context, action.model)
    }
}

/// Owned fields of the region lose their region id while the inherited
/// region is shown, and get it back on restore.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelRestoreInheritedRegionActionProcessor;

impl ActionProcessor for ModelRestoreInheritedRegionActionProcessor {
    type Action = RestoreInheritedRegionAction;

    fn execute(&self, store: &mut ModelStore, action: &mut Self::Action) -> Result<NodeId> {
        let inherited = inherited_of(action.inherited, store, action.model)?;
        set_field_regions(store, &action.contained_fields, None)?;
        swap_in_inherited(store, action.model, inherited, action.context, ModelContainer::Regions)?;
        Ok(inherited)
    }

    fn restore(&self, store: &mut ModelStore, action: &mut Self::Action) -> Result<NodeId> {
        let region_id = node_key(store, action.model)?;
        set_field_regions(store, &action.contained_fields, Some(&region_id))?;
        swap_back_override(store, action.model, action.context, ModelContainer::Regions)?;
        Ok(action.model)
    }

    fn changeset(&self, store: &ModelStore, action: &Self::Action) -> Result<Vec<ModelChangeSet>> {
        restore_change_set(store, action.context, action.model)
    }
}

/// A control without an inherited counterpart is removed, remembering its
/// position.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelRestoreInheritedControlActionProcessor;

impl ActionProcessor for ModelRestoreInheritedControlActionProcessor {
    type Action = RestoreInheritedControlAction;

    fn execute(&self, store: &mut ModelStore, action: &mut Self::Action) -> Result<NodeId> {
        match action.inherited {
            Some(inherited) => {
                swap_in_inherited(
                    store,
                    action.model,
                    inherited,
                    action.context,
                    ModelContainer::Controls,
                )?;
                Ok(inherited)
            }
            None => {
                action.removed = Some(detach_model(
                    store,
                    action.model,
                    action.context,
                    ModelContainer::Controls,
                )?);
                Ok(action.model)
            }
        }
    }

    fn restore(&self, store: &mut ModelStore, action: &mut Self::Action) -> Result<NodeId> {
        match action.inherited {
            Some(_) => {
                swap_back_override(store, action.model, action.context, ModelContainer::Controls)?
            }
            None => {
                let position = action
                    .removed
                    .ok_or_else(|| not_executed("RestoreInheritedControlAction"))?;
                reattach_model(
                    store,
                    action.model,
                    action.context,
                    ModelContainer::Controls,
                    position,
                )?;
            }
        }
        Ok(action.model)
    }

    fn changeset(&self, store: &ModelStore, action: &Self::Action) -> Result<Vec<ModelChangeSet>> {
        restore_change_set(store, action.context, action.model)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ModelRestoreInheritedAttributeActionProcessor;

impl ActionProcessor for ModelRestoreInheritedAttributeActionProcessor {
    type Action = RestoreInheritedAttributeAction;

    fn execute(&self, store: &mut ModelStore, action: &mut Self::Action) -> Result<NodeId> {
        let inherited = inherited_of(action.inherited, store, action.model)?;
        swap_in_inherited(
            store,
            action.model,
            inherited,
            action.context,
            ModelContainer::Attributes,
        )?;
        Ok(inherited)
    }

    fn restore(&self, store: &mut ModelStore, action: &mut Self::Action) -> Result<NodeId> {
        swap_back_override(store, action.model, action.context, ModelContainer::Attributes)?;
        Ok(action.model)
    }

    fn changeset(&self, store: &ModelStore, action: &Self::Action) -> Result<Vec<ModelChangeSet>> {
        restore_change_set(store, action.context, action.model)
    }
}
