use tracing::debug;

use super::{node_key, ActionProcessor};
use crate::actions::types::{
    CreateControlAction, CreateControlParamAction, CreateFieldAction, CreatePropertyAction,
    CreateRegionAction,
};
use crate::changeset::{ModelChangeSet, ModelChangeSetBuilder, ModelOperation};
use crate::error::Result;
use crate::model::{ModelContainer, ModelStore, NodeId};

/// Attach the created model, overwriting a same-id entry in place.
fn attach_created(
    store: &mut ModelStore,
    model: NodeId,
    context: NodeId,
    slot: ModelContainer,
) -> Result<Option<NodeId>> {
    let replaced = store.replace(context, slot, model)?;
    store.set_parent(model, Some(context))?;
    debug!(model = %node_key(store, model)?, slot = %slot, "attached created model");
    Ok(replaced)
}

fn detach_created(
    store: &mut ModelStore,
    model: NodeId,
    context: NodeId,
    slot: ModelContainer,
    replaced: Option<NodeId>,
) -> Result<()> {
    match replaced {
        Some(previous) => {
            store.replace(context, slot, previous)?;
        }
        None => {
            let key = node_key(store, model)?;
            store.detach(context, slot, &key)?;
        }
    }
    store.set_parent(model, None)
}

/// ADD for the model and MODIFY for every attribute, dirty or not: the
/// model does not exist server side yet.
fn created_change_sets(store: &ModelStore, model: NodeId) -> Result<Vec<ModelChangeSet>> {
    let mut sets = vec![ModelChangeSetBuilder::build_change_set(
        store,
        model,
        ModelOperation::Add,
    )?];
    let attributes: Vec<NodeId> = store.node(model)?.attributes.to_vec();
    sets.extend(ModelChangeSetBuilder::build_change_sets(
        store,
        attributes,
        ModelOperation::Modify,
    )?);
    Ok(sets)
}

macro_rules! create_processor {
    ($(#[$doc:meta])* $name:ident, $action:ty, $slot:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl ActionProcessor for $name {
            type Action = $action;

            fn execute(&self, store: &mut ModelStore, action: &mut Self::Action) -> Result<NodeId> {
                action.replaced = attach_created(store, action.model, action.context, $slot)?;
                Ok(action.model)
            }

            fn restore(&self, store: &mut ModelStore, action: &mut Self::Action) -> Result<NodeId> {
                detach_created(store, action.model, action.context, $slot, action.replaced)?;
                Ok(action.model)
            }

            fn changeset(
                &self,
                store: &ModelStore,
                action: &Self::Action,
            ) -> Result<Vec<ModelChangeSet>> {
                created_change_sets(store, action.model)
            }
        }
    };
}

create_processor!(ModelCreateFieldActionProcessor, CreateFieldAction, ModelContainer::Fields);
create_processor!(ModelCreateRegionActionProcessor, CreateRegionAction, ModelContainer::Regions);
create_processor!(ModelCreateControlActionProcessor, CreateControlAction, ModelContainer::Controls);
create_processor!(
    ModelCreateControlParamActionProcessor,
    CreateControlParamAction,
    ModelContainer::ControlParams
);

/// Properties are attached to their class and registered in the store
/// property registry. The factory guarantees the uri is not taken.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelCreatePropertyActionProcessor;

impl ActionProcessor for ModelCreatePropertyActionProcessor {
    type Action = CreatePropertyAction;

    fn execute(&self, store: &mut ModelStore, action: &mut Self::Action) -> Result<NodeId> {
        action.replaced = attach_created(
            store,
            action.model,
            action.context,
            ModelContainer::Properties,
        )?;
        store.register_property(action.model)?;
        Ok(action.model)
    }

    fn restore(&self, store: &mut ModelStore, action: &mut Self::Action) -> Result<NodeId> {
        let key = node_key(store, action.model)?;
        store.unregister_property(&key);
        detach_created(
            store,
            action.model,
            action.context,
            ModelContainer::Properties,
            action.replaced,
        )?;
        Ok(action.model)
    }

    fn changeset(&self, store: &ModelStore, action: &Self::Action) -> Result<Vec<ModelChangeSet>> {
        created_change_sets(store, action.model)
    }
}
