use tracing::debug;

use super::{node_key, not_executed, ActionProcessor};
use crate::actions::types::{
    RemoveControlAction, RemoveFieldAction, RemoveRegionAction, RemovedPosition,
};
use crate::changeset::{ModelChangeSet, ModelChangeSetBuilder, ModelOperation};
use crate::error::{ModelError, Result};
use crate::model::{ModelContainer, ModelStore, NodeId};

/// Detach `model` and clear its parent, returning where it was.
pub(crate) fn detach_model(
    store: &mut ModelStore,
    model: NodeId,
    context: NodeId,
    slot: ModelContainer,
) -> Result<RemovedPosition> {
    let key = node_key(store, model)?;
    let parent = store.parent(model);
    let (index, _) = store
        .detach(context, slot, &key)?
        .ok_or_else(|| ModelError::NotFound(format!("{slot} {key}")))?;
    store.set_parent(model, None)?;
    debug!(model = %key, slot = %slot, index, "detached model");
    Ok(RemovedPosition { index, parent })
}

pub(crate) fn reattach_model(
    store: &mut ModelStore,
    model: NodeId,
    context: NodeId,
    slot: ModelContainer,
    position: RemovedPosition,
) -> Result<()> {
    store.attach(context, slot, model, Some(position.index))?;
    store.set_parent(model, position.parent)
}

/// Point every field in `fields` at `region_id`.
pub(crate) fn set_field_regions(
    store: &mut ModelStore,
    fields: &[NodeId],
    region_id: Option<&str>,
) -> Result<()> {
    for &field in fields {
        if let Some(data) = store.node_mut(field)?.as_field_mut() {
            data.region_id = region_id.map(String::from);
        }
    }
    Ok(())
}

macro_rules! remove_processor {
    ($name:ident, $action:ty, $slot:expr) => {
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl ActionProcessor for $name {
            type Action = $action;

            fn execute(&self, store: &mut ModelStore, action: &mut Self::Action) -> Result<NodeId> {
                action.removed = Some(detach_model(store, action.model, action.context, $slot)?);
                Ok(action.model)
            }

            fn restore(&self, store: &mut ModelStore, action: &mut Self::Action) -> Result<NodeId> {
                let position = action.removed.ok_or_else(|| not_executed(stringify!($action)))?;
                reattach_model(store, action.model, action.context, $slot, position)?;
                Ok(action.model)
            }

            fn changeset(
                &self,
                store: &ModelStore,
                action: &Self::Action,
            ) -> Result<Vec<ModelChangeSet>> {
                Ok(vec![ModelChangeSetBuilder::build_child_change_set(
                    store,
                    action.context,
                    action.model,
                    ModelOperation::Remove,
                )?])
            }
        }
    };
}

remove_processor!(ModelRemoveFieldActionProcessor, RemoveFieldAction, ModelContainer::Fields);
remove_processor!(ModelRemoveControlActionProcessor, RemoveControlAction, ModelContainer::Controls);

/// Owned fields of the removed region are left without a region until the
/// removal is restored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelRemoveRegionActionProcessor;

impl ActionProcessor for ModelRemoveRegionActionProcessor {
    type Action = RemoveRegionAction;

    fn execute(&self, store: &mut ModelStore, action: &mut Self::Action) -> Result<NodeId> {
        let position = detach_model(store, action.model, action.context, ModelContainer::Regions)?;
        set_field_regions(store, &action.contained_fields, None)?;
        action.removed = Some(position);
        Ok(action.model)
    }

    fn restore(&self, store: &mut ModelStore, action: &mut Self::Action) -> Result<NodeId> {
        let position = action.removed.ok_or_else(|| not_executed("RemoveRegionAction"))?;
        let region_id = node_key(store, action.model)?;
        set_field_regions(store, &action.contained_fields, Some(&region_id))?;
        reattach_model(store, action.model, action.context, ModelContainer::Regions, position)?;
        Ok(action.model)
    }

    fn changeset(&self, store: &ModelStore, action: &Self::Action) -> Result<Vec<ModelChangeSet>> {
        Ok(vec![ModelChangeSetBuilder::build_child_change_set(
            store,
            action.context,
            action.model,
            ModelOperation::Remove,
        )?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ModelActionFactory;
    use crate::model::store::new_node;
    use crate::model::{ModelKind, ModelType, ModelsMetaData};

    fn definition_with_fields(ids: &[&str]) -> (ModelStore, NodeId, Vec<NodeId>) {
        let mut store = ModelStore::new();
        let def = new_node(&mut store, "media", ModelKind::empty(ModelType::Definition), None);
        store.register_definition(def).unwrap();
        let fields = ids
            .iter()
            .map(|id| {
                let field = new_node(&mut store, id, ModelKind::empty(ModelType::Field), Some(def));
                store.attach(def, ModelContainer::Fields, field, None).unwrap();
                field
            })
            .collect();
        (store, def, fields)
    }

    #[test]
    fn remove_field_clears_parent_and_restores_position() {
        let meta = ModelsMetaData::default();
        let (mut store, def, fields) =
            definition_with_fields(&["title", "description", "emailAddress"]);
        let snapshot = store.clone();
        let mut action = ModelActionFactory::new(&meta)
            .remove_field(&mut store, fields[1], def)
            .unwrap();

        let processor = ModelRemoveFieldActionProcessor;
        processor.execute(&mut store, &mut action).unwrap();
        assert_eq!(store.parent(fields[1]), None);
        let ids: Vec<_> = store.children(def, ModelContainer::Fields).unwrap().ids().collect();
        assert_eq!(ids, vec!["title", "emailAddress"]);
        assert_eq!(action.removed.map(|r| r.index), Some(1));

        processor.restore(&mut store, &mut action).unwrap();
        assert_eq!(store, snapshot);
    }

    #[test]
    fn remove_changeset_addresses_through_context() {
        let meta = ModelsMetaData::default();
        let (mut store, def, fields) = definition_with_fields(&["title"]);
        let mut action = ModelActionFactory::new(&meta)
            .remove_field(&mut store, fields[0], def)
            .unwrap();
        let processor = ModelRemoveFieldActionProcessor;
        processor.execute(&mut store, &mut action).unwrap();

        let sets = processor.changeset(&store, &action).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].selector, "definition=media/field=title");
        assert_eq!(sets[0].operation, ModelOperation::Remove);
    }

    #[test]
    fn remove_region_clears_region_of_owned_fields() {
        let meta = ModelsMetaData::default();
        let (mut store, def, fields) = definition_with_fields(&["title", "duration"]);
        let region =
            new_node(&mut store, "general", ModelKind::empty(ModelType::Region), Some(def));
        store.attach(def, ModelContainer::Regions, region, None).unwrap();
        let title = store.node_mut(fields[0]).unwrap().as_field_mut().unwrap();
        title.region_id = Some("general".into());
        let mut action = ModelActionFactory::new(&meta)
            .remove_region(&mut store, region, def)
            .unwrap();
        assert_eq!(action.contained_fields, vec![fields[0]]);
        let snapshot = store.clone();

        let processor = ModelRemoveRegionActionProcessor;
        processor.execute(&mut store, &mut action).unwrap();
        assert_eq!(store.node(fields[0]).unwrap().as_field().unwrap().region_id, None);
        assert!(store.child(def, ModelContainer::Regions, "general").is_none());

        processor.restore(&mut store, &mut action).unwrap();
        assert_eq!(store, snapshot);
    }

    #[test]
    fn restore_before_execute_is_rejected() {
        let meta = ModelsMetaData::default();
        let (mut store, def, fields) = definition_with_fields(&["title"]);
        let mut action = ModelActionFactory::new(&meta)
            .remove_field(&mut store, fields[0], def)
            .unwrap();
        let err = ModelRemoveFieldActionProcessor.restore(&mut store, &mut action).unwrap_err();
        assert!(matches!(err, ModelError::InvalidAction(_)));
    }
}
